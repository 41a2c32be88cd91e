// Hand-curated synonym tables. Terms are written in natural Portuguese;
// `Ontology::medical()` normalizes them once at construction.

use super::vocabulary::{AcademicLevel, ClinicalContext, ExamType, OutputFormat, Specialty};

pub(crate) const SPECIALTY_TERMS: &[(Specialty, &[&str])] = &[
    (
        Specialty::Cardiologia,
        &["cardiologia", "cardio", "cardiovascular", "coração", "cardiologista"],
    ),
    (
        Specialty::Pneumologia,
        &["pneumologia", "pneumo", "pneumologista", "doenças respiratórias"],
    ),
    (Specialty::Neurologia, &["neurologia", "neuro", "neurologista"]),
    (
        Specialty::Gastroenterologia,
        &["gastroenterologia", "gastro", "gastroenterologista", "hepatologia"],
    ),
    (Specialty::Nefrologia, &["nefrologia", "nefro", "nefrologista"]),
    (
        Specialty::Endocrinologia,
        &["endocrinologia", "endócrino", "endocrino", "endocrinologista", "metabologia"],
    ),
    (
        Specialty::Infectologia,
        &["infectologia", "infecto", "infectologista", "doenças infecciosas"],
    ),
    (Specialty::Hematologia, &["hematologia", "hemato", "hematologista"]),
    (
        Specialty::Oncologia,
        &["oncologia", "onco", "oncologista", "cancerologia"],
    ),
    (Specialty::Reumatologia, &["reumatologia", "reumato", "reumatologista"]),
    (Specialty::Dermatologia, &["dermatologia", "dermato", "dermatologista"]),
    (
        Specialty::Psiquiatria,
        &["psiquiatria", "psiq", "psiquiatra", "saúde mental"],
    ),
    (
        Specialty::Pediatria,
        &["pediatria", "pediátrico", "pediátrica", "pediatra", "neonatologia", "crianças"],
    ),
    (
        Specialty::GinecologiaObstetricia,
        &[
            "ginecologia e obstetrícia",
            "ginecologia",
            "obstetrícia",
            "gineco",
            "obstetra",
            "go",
        ],
    ),
    (
        Specialty::Cirurgia,
        &["cirurgia geral", "cirurgia", "cirúrgico", "cirúrgica", "cirurgião"],
    ),
    (
        Specialty::Ortopedia,
        &["ortopedia", "orto", "traumatologia", "ortopedista"],
    ),
    (Specialty::Urologia, &["urologia", "uro", "urologista"]),
    (Specialty::Oftalmologia, &["oftalmologia", "oftalmo", "oftalmologista"]),
    (
        Specialty::Otorrinolaringologia,
        &["otorrinolaringologia", "otorrino", "orl"],
    ),
    (
        Specialty::MedicinaIntensiva,
        &["medicina intensiva", "intensivismo", "intensivista"],
    ),
    (
        Specialty::MedicinaEmergencia,
        &["medicina de emergência", "medicina de urgência", "emergencista"],
    ),
    (
        Specialty::MedicinaFamilia,
        &["medicina de família", "medicina de família e comunidade", "mfc", "saúde da família"],
    ),
    (
        Specialty::ClinicaMedica,
        &["clínica médica", "clínica geral", "medicina interna", "clínico geral"],
    ),
    (Specialty::Anestesiologia, &["anestesiologia", "anestesia", "anestesista"]),
    (Specialty::Radiologia, &["radiologia", "radiologista", "diagnóstico por imagem"]),
];

pub(crate) const LEVEL_TERMS: &[(AcademicLevel, &[&str])] = &[
    (
        AcademicLevel::CicloBasico,
        &["ciclo básico", "pré-clínico", "primeiro período", "primeiros períodos", "calouro", "calouros"],
    ),
    (
        AcademicLevel::CicloClinico,
        &["ciclo clínico", "terceiro ano", "quarto ano"],
    ),
    (
        AcademicLevel::Internato,
        &["internato", "interno", "doutorando", "quinto ano", "sexto ano"],
    ),
    (
        AcademicLevel::Residencia,
        &["residência", "residência médica", "residente", "r1", "r2", "r3"],
    ),
    (AcademicLevel::Especializacao, &["especialização", "especialista"]),
    (
        AcademicLevel::PosGraduacao,
        &["pós-graduação", "pós graduação", "mestrado", "doutorado"],
    ),
    (
        AcademicLevel::Graduacao,
        &["graduação", "estudante de medicina", "acadêmico de medicina", "faculdade"],
    ),
];

pub(crate) const FORMAT_TERMS: &[(OutputFormat, &[&str])] = &[
    (
        OutputFormat::Flashcards,
        &["flashcards", "flashcard", "flash cards", "cartões de memorização", "cartões", "cards", "anki"],
    ),
    (
        OutputFormat::Resumo,
        &["resumo", "resumos", "resumir", "resuma", "síntese", "sumário"],
    ),
    (
        OutputFormat::Questoes,
        &["questões", "questão", "perguntas", "múltipla escolha", "simulado", "exercícios", "quiz"],
    ),
    (
        OutputFormat::CasoClinico,
        &["caso clínico", "casos clínicos", "vinheta clínica"],
    ),
    (
        OutputFormat::MapaMental,
        &["mapa mental", "mapas mentais", "mapa conceitual", "mind map"],
    ),
    (
        OutputFormat::Tabela,
        &["tabela comparativa", "tabela", "quadro comparativo", "comparativo"],
    ),
    (
        OutputFormat::Checklist,
        &["checklist", "check-list", "lista de verificação", "lista de checagem"],
    ),
    (
        OutputFormat::Fluxograma,
        &["fluxograma", "algoritmo", "fluxo de atendimento"],
    ),
    (
        OutputFormat::PlanoEstudos,
        &["plano de estudos", "plano de estudo", "cronograma", "cronograma de estudos", "planejamento de estudos"],
    ),
    (
        OutputFormat::Explicacao,
        &["explicação", "explique", "explicar", "explica", "didático"],
    ),
    (OutputFormat::Mnemonico, &["mnemônico", "mnemônicos", "macete", "macetes"]),
];

pub(crate) const CONTEXT_TERMS: &[(ClinicalContext, &[&str])] = &[
    (
        ClinicalContext::Ambulatorio,
        &["ambulatório", "ambulatorial", "consultório"],
    ),
    (
        ClinicalContext::ProntoSocorro,
        &["pronto-socorro", "pronto socorro", "ps", "emergência", "urgência", "plantão", "sala vermelha"],
    ),
    (
        ClinicalContext::Enfermaria,
        &["enfermaria", "internação", "paciente internado"],
    ),
    (
        ClinicalContext::Uti,
        &["uti", "cti", "terapia intensiva", "unidade de terapia intensiva", "paciente crítico"],
    ),
    (
        ClinicalContext::CentroCirurgico,
        &["centro cirúrgico", "bloco cirúrgico", "sala cirúrgica", "intraoperatório", "perioperatório"],
    ),
    (
        ClinicalContext::AtencaoPrimaria,
        &["atenção primária", "atenção básica", "ubs", "posto de saúde", "unidade básica", "esf"],
    ),
];

pub(crate) const EXAM_TERMS: &[(ExamType, &[&str])] = &[
    (ExamType::Enare, &["enare"]),
    (ExamType::Revalida, &["revalida"]),
    (ExamType::UspSp, &["usp", "fmusp", "usp-sp", "usp sp"]),
    (ExamType::Unifesp, &["unifesp"]),
    (ExamType::SusSp, &["sus-sp", "sus sp", "sus"]),
    (
        ExamType::TituloEspecialista,
        &["prova de título", "título de especialista", "tego", "teot"],
    ),
    (ExamType::Usmle, &["usmle", "step 1", "step 2"]),
    (
        ExamType::ProvaFaculdade,
        &["prova da faculdade", "prova da facul", "prova do semestre"],
    ),
    (ExamType::Osce, &["osce", "prova prática", "estação prática"]),
];

/// Canonical topic, the specialty it belongs to, and its synonyms.
pub(crate) struct TopicEntry {
    pub canonical: &'static str,
    pub specialty: Specialty,
    pub synonyms: &'static [&'static str],
}

pub(crate) const TOPIC_TERMS: &[TopicEntry] = &[
    TopicEntry {
        canonical: "insuficiência cardíaca",
        specialty: Specialty::Cardiologia,
        synonyms: &["ic", "icc", "insuficiência cardíaca congestiva", "ic descompensada"],
    },
    TopicEntry {
        canonical: "infarto agudo do miocárdio",
        specialty: Specialty::Cardiologia,
        synonyms: &["iam", "infarto", "síndrome coronariana aguda", "sca", "iamcsst"],
    },
    TopicEntry {
        canonical: "arritmias",
        specialty: Specialty::Cardiologia,
        synonyms: &["arritmia", "fibrilação atrial", "fa", "flutter atrial", "taquiarritmias"],
    },
    TopicEntry {
        canonical: "hipertensão arterial",
        specialty: Specialty::Cardiologia,
        synonyms: &["hipertensão", "has", "hipertensão arterial sistêmica", "pressão alta"],
    },
    TopicEntry {
        canonical: "asma",
        specialty: Specialty::Pneumologia,
        synonyms: &["crise asmática", "asma brônquica"],
    },
    TopicEntry {
        canonical: "dpoc",
        specialty: Specialty::Pneumologia,
        synonyms: &["doença pulmonar obstrutiva crônica", "enfisema"],
    },
    TopicEntry {
        canonical: "pneumonia",
        specialty: Specialty::Pneumologia,
        synonyms: &["pac", "pneumonia adquirida na comunidade"],
    },
    TopicEntry {
        canonical: "tuberculose",
        specialty: Specialty::Infectologia,
        synonyms: &["tb"],
    },
    TopicEntry {
        canonical: "hiv/aids",
        specialty: Specialty::Infectologia,
        synonyms: &["hiv", "aids"],
    },
    TopicEntry {
        canonical: "sepse",
        specialty: Specialty::MedicinaIntensiva,
        synonyms: &["choque séptico", "sepsis"],
    },
    TopicEntry {
        canonical: "acidente vascular cerebral",
        specialty: Specialty::Neurologia,
        synonyms: &["avc", "avci", "avch", "derrame"],
    },
    TopicEntry {
        canonical: "epilepsia",
        specialty: Specialty::Neurologia,
        synonyms: &["crise convulsiva", "convulsão", "estado de mal epiléptico"],
    },
    TopicEntry {
        canonical: "diabetes mellitus",
        specialty: Specialty::Endocrinologia,
        synonyms: &["diabetes", "dm", "dm1", "dm2", "cetoacidose diabética"],
    },
    TopicEntry {
        canonical: "hipotireoidismo",
        specialty: Specialty::Endocrinologia,
        synonyms: &["tireoidite de hashimoto"],
    },
    TopicEntry {
        canonical: "doença renal crônica",
        specialty: Specialty::Nefrologia,
        synonyms: &["drc", "insuficiência renal", "lesão renal aguda", "lra"],
    },
    TopicEntry {
        canonical: "cirrose hepática",
        specialty: Specialty::Gastroenterologia,
        synonyms: &["cirrose", "hipertensão portal"],
    },
    TopicEntry {
        canonical: "anemias",
        specialty: Specialty::Hematologia,
        synonyms: &["anemia", "anemia ferropriva"],
    },
    TopicEntry {
        canonical: "abdome agudo",
        specialty: Specialty::Cirurgia,
        synonyms: &["apendicite", "apendicite aguda", "colecistite"],
    },
    TopicEntry {
        canonical: "trauma",
        specialty: Specialty::Cirurgia,
        synonyms: &["atls", "politrauma", "politraumatizado"],
    },
    TopicEntry {
        canonical: "pré-eclâmpsia",
        specialty: Specialty::GinecologiaObstetricia,
        synonyms: &["eclâmpsia", "doença hipertensiva da gestação"],
    },
    TopicEntry {
        canonical: "bronquiolite",
        specialty: Specialty::Pediatria,
        synonyms: &["vsr"],
    },
    TopicEntry {
        canonical: "depressão",
        specialty: Specialty::Psiquiatria,
        synonyms: &["transtorno depressivo maior"],
    },
    TopicEntry {
        canonical: "parada cardiorrespiratória",
        specialty: Specialty::MedicinaEmergencia,
        synonyms: &["pcr", "acls", "rcp"],
    },
    TopicEntry {
        canonical: "lúpus eritematoso sistêmico",
        specialty: Specialty::Reumatologia,
        synonyms: &["lúpus", "les"],
    },
];
