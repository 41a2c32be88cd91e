//! Canonical vocabularies for the enumerated entity kinds.
//!
//! Each enum serializes as its snake_case key (`"residencia"`, `"flashcards"`),
//! and renders as a Portuguese label when inserted into a template.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($key:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical key, identical to the serde representation.
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_key(key: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.key() == key)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

vocabulary! {
    /// Medical specialty.
    Specialty {
        Cardiologia => ("cardiologia", "Cardiologia"),
        Pneumologia => ("pneumologia", "Pneumologia"),
        Neurologia => ("neurologia", "Neurologia"),
        Gastroenterologia => ("gastroenterologia", "Gastroenterologia"),
        Nefrologia => ("nefrologia", "Nefrologia"),
        Endocrinologia => ("endocrinologia", "Endocrinologia"),
        Infectologia => ("infectologia", "Infectologia"),
        Hematologia => ("hematologia", "Hematologia"),
        Oncologia => ("oncologia", "Oncologia"),
        Reumatologia => ("reumatologia", "Reumatologia"),
        Dermatologia => ("dermatologia", "Dermatologia"),
        Psiquiatria => ("psiquiatria", "Psiquiatria"),
        Pediatria => ("pediatria", "Pediatria"),
        GinecologiaObstetricia => ("ginecologia_obstetricia", "Ginecologia e Obstetrícia"),
        Cirurgia => ("cirurgia", "Cirurgia Geral"),
        Ortopedia => ("ortopedia", "Ortopedia e Traumatologia"),
        Urologia => ("urologia", "Urologia"),
        Oftalmologia => ("oftalmologia", "Oftalmologia"),
        Otorrinolaringologia => ("otorrinolaringologia", "Otorrinolaringologia"),
        MedicinaIntensiva => ("medicina_intensiva", "Medicina Intensiva"),
        MedicinaEmergencia => ("medicina_emergencia", "Medicina de Emergência"),
        MedicinaFamilia => ("medicina_familia", "Medicina de Família e Comunidade"),
        ClinicaMedica => ("clinica_medica", "Clínica Médica"),
        Anestesiologia => ("anestesiologia", "Anestesiologia"),
        Radiologia => ("radiologia", "Radiologia"),
    }
}

vocabulary! {
    /// Where the learner is in their training.
    AcademicLevel {
        CicloBasico => ("ciclo_basico", "Ciclo básico"),
        CicloClinico => ("ciclo_clinico", "Ciclo clínico"),
        Internato => ("internato", "Internato"),
        Residencia => ("residencia", "Residência médica"),
        Especializacao => ("especializacao", "Especialização"),
        PosGraduacao => ("pos_graduacao", "Pós-graduação"),
        Graduacao => ("graduacao", "Graduação"),
    }
}

vocabulary! {
    /// Desired shape of the generated material.
    OutputFormat {
        Flashcards => ("flashcards", "Flashcards"),
        Resumo => ("resumo", "Resumo"),
        Questoes => ("questoes", "Questões de múltipla escolha"),
        CasoClinico => ("caso_clinico", "Caso clínico"),
        MapaMental => ("mapa_mental", "Mapa mental"),
        Tabela => ("tabela", "Tabela comparativa"),
        Checklist => ("checklist", "Checklist"),
        Fluxograma => ("fluxograma", "Fluxograma"),
        PlanoEstudos => ("plano_estudos", "Plano de estudos"),
        Explicacao => ("explicacao", "Explicação didática"),
        Mnemonico => ("mnemonico", "Mnemônicos"),
    }
}

vocabulary! {
    /// Care setting the material should assume.
    ClinicalContext {
        Ambulatorio => ("ambulatorio", "Ambulatório"),
        ProntoSocorro => ("pronto_socorro", "Pronto-socorro"),
        Enfermaria => ("enfermaria", "Enfermaria"),
        Uti => ("uti", "UTI"),
        CentroCirurgico => ("centro_cirurgico", "Centro cirúrgico"),
        AtencaoPrimaria => ("atencao_primaria", "Atenção primária"),
    }
}

vocabulary! {
    /// Target exam.
    ExamType {
        Enare => ("enare", "ENARE"),
        Revalida => ("revalida", "Revalida"),
        UspSp => ("usp_sp", "USP-SP"),
        Unifesp => ("unifesp", "UNIFESP"),
        SusSp => ("sus_sp", "SUS-SP"),
        TituloEspecialista => ("titulo_especialista", "Prova de título de especialista"),
        Usmle => ("usmle", "USMLE"),
        ProvaFaculdade => ("prova_faculdade", "Prova da faculdade"),
        Osce => ("osce", "OSCE"),
    }
}

impl AcademicLevel {
    /// Depth of treatment expected at this level.
    pub fn depth(self) -> &'static str {
        match self {
            AcademicLevel::CicloBasico | AcademicLevel::Graduacao => "introdutório",
            AcademicLevel::CicloClinico => "intermediário",
            AcademicLevel::Internato => "intermediário, com foco prático",
            AcademicLevel::Residencia | AcademicLevel::Especializacao => "avançado",
            AcademicLevel::PosGraduacao => "aprofundado, com base em evidências",
        }
    }
}
