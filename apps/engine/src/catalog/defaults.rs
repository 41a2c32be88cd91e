// Built-in study templates, used when no catalog file is configured.

use super::Template;

const CARDIO_REVIEW_BODY: &str = r#"Você é um cardiologista e preceptor experiente.
Prepare material de revisão sobre [TEMA] para um estudante no nível [NÍVEL].
Entregue o conteúdo no formato [FORMATO], destacando fisiopatologia, diagnóstico e tratamento
segundo as diretrizes brasileiras mais recentes."#;

const FLASHCARDS_BODY: &str = r#"Atue como professor de [ESPECIALIDADE] preparando material de revisão espaçada.
Crie 20 flashcards sobre [TEMA] para um estudante no nível [NÍVEL].
Cada cartão deve ter uma pergunta objetiva na frente e uma resposta curta no verso.
Priorize conceitos cobrados em provas e inclua um cartão de pegadinhas frequentes."#;

const CLINICAL_CASE_BODY: &str = r#"Crie um caso clínico interativo de [ESPECIALIDADE] sobre [TEMA].
Cenário: [CONTEXTO CLÍNICO]. Público: [NÍVEL].
Apresente a história em etapas, pedindo minha conduta antes de revelar exames e desfecho.
Ao final, discuta diagnósticos diferenciais e os principais erros de raciocínio."#;

const QUESTION_BANK_BODY: &str = r#"Elabore 10 questões de múltipla escolha no estilo [PROVA] sobre [TEMA] ([ESPECIALIDADE]).
Nível de dificuldade compatível com [NÍVEL].
Para cada questão, traga cinco alternativas, o gabarito e um comentário explicando cada alternativa."#;

const SUMMARY_BODY: &str = r#"Faça um resumo estruturado sobre [TEMA] para o nível [NÍVEL].
Use tópicos: definição, epidemiologia, fisiopatologia, quadro clínico, diagnóstico, tratamento.
Material de apoio:
[CONTEÚDO]"#;

const STUDY_PLAN_BODY: &str = r#"Monte um plano de estudos de [ESPECIALIDADE] para a prova [PROVA].
Tempo disponível: [PRAZO]. Nível atual: [NÍVEL].
Distribua teoria, questões e revisões, indicando os temas de maior incidência."#;

const MIND_MAP_BODY: &str = r#"Construa um mapa mental em texto (hierarquia com indentação) sobre [TEMA] em [ESPECIALIDADE].
Ramos obrigatórios: conceito, causas, manifestações, diagnóstico, conduta."#;

const SURGICAL_CHECKLIST_BODY: &str = r#"Monte um checklist de segurança cirúrgica para [PROCEDIMENTO].
Ambiente: [CONTEXTO CLÍNICO].
Organize em antes da indução, antes da incisão e antes da saída da sala."#;

const EMERGENCY_PROTOCOL_BODY: &str = r#"Descreva em fluxograma textual a abordagem de [TEMA] no [CONTEXTO CLÍNICO].
Inclua critérios de gravidade, exames iniciais, condutas por tempo e critérios de internação."#;

const EXPLANATION_BODY: &str = r#"Explique de forma didática, para o nível [NÍVEL], o tema [TEMA].
Minha dúvida original: [PEDIDO]
Use analogias simples e termine com três perguntas para checar meu entendimento."#;

fn template(
    id: &str,
    title: &str,
    category: &str,
    description: &str,
    body: &str,
    tags: &[&str],
    recommended_ai: &str,
    estimated_time: &str,
) -> Template {
    Template {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        body: body.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        recommended_ai: Some(recommended_ai.to_string()),
        estimated_time: Some(estimated_time.to_string()),
        usage_count: 0,
    }
}

pub fn builtin_templates() -> Vec<Template> {
    vec![
        template(
            "cardio-revisao",
            "Revisão de Cardiologia",
            "cardiologia",
            "Material de revisão de cardiologia adaptável a vários formatos",
            CARDIO_REVIEW_BODY,
            &["cardiologia", "flashcards", "insuficiência cardíaca", "ecg"],
            "Claude",
            "10 min",
        ),
        template(
            "flashcards-revisao",
            "Flashcards de revisão espaçada",
            "flashcards",
            "Cartões pergunta e resposta para memorização",
            FLASHCARDS_BODY,
            &["flashcards", "memorização", "anki", "revisão espaçada"],
            "ChatGPT",
            "5 min",
        ),
        template(
            "caso-clinico-interativo",
            "Caso clínico interativo",
            "caso_clinico",
            "Caso em etapas para treinar raciocínio clínico",
            CLINICAL_CASE_BODY,
            &["caso clínico", "raciocínio clínico", "discussão"],
            "Claude",
            "20 min",
        ),
        template(
            "banco-questoes",
            "Questões comentadas estilo prova",
            "questoes",
            "Questões de múltipla escolha com gabarito comentado",
            QUESTION_BANK_BODY,
            &["questões", "simulado", "prova", "residência"],
            "ChatGPT",
            "15 min",
        ),
        template(
            "resumo-estruturado",
            "Resumo estruturado",
            "resumo",
            "Resumo em tópicos a partir de um tema ou material anexado",
            SUMMARY_BODY,
            &["resumo", "síntese", "revisão"],
            "Claude",
            "10 min",
        ),
        template(
            "plano-estudos",
            "Plano de estudos para prova",
            "plano_estudos",
            "Cronograma de estudos por especialidade e prazo",
            STUDY_PLAN_BODY,
            &["cronograma", "planejamento", "estudos"],
            "ChatGPT",
            "10 min",
        ),
        template(
            "mapa-mental",
            "Mapa mental",
            "mapa_mental",
            "Hierarquia de conceitos para revisão visual",
            MIND_MAP_BODY,
            &["mapa mental", "esquema", "visual"],
            "ChatGPT",
            "5 min",
        ),
        template(
            "checklist-cirurgico",
            "Checklist de cirurgia segura",
            "cirurgia",
            "Checklist perioperatório baseado no protocolo da OMS",
            SURGICAL_CHECKLIST_BODY,
            &["checklist", "centro cirúrgico", "segurança do paciente", "cirurgia"],
            "Claude",
            "5 min",
        ),
        template(
            "protocolo-emergencia",
            "Protocolo de emergência",
            "medicina_emergencia",
            "Fluxograma de atendimento no pronto-socorro",
            EMERGENCY_PROTOCOL_BODY,
            &["fluxograma", "emergência", "protocolo", "pronto-socorro"],
            "Claude",
            "10 min",
        ),
        template(
            "explicacao-didatica",
            "Explicação didática",
            "explicacao",
            "Explicação com analogias e perguntas de checagem",
            EXPLANATION_BODY,
            &["explicação", "didática", "fisiopatologia"],
            "Claude",
            "5 min",
        ),
    ]
}
