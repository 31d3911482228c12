// Extraction-phase prompt templates, in pt-BR like the interview prompts.

/// System instruction for the extraction call. The conversational persona is
/// swapped out entirely: this role produces JSON and nothing else.
pub const JSON_EXTRACTOR_SYSTEM: &str = "\
Você é um assistente especialista em analisar transcrições de conversas e \
gerar perfis de carreira estruturados em formato JSON. \
Siga estritamente o formato JSON solicitado. Retorne APENAS o JSON, sem \
nenhum texto adicional, comentários ou explicações antes ou depois do \
objeto JSON.";

/// Final user turn appended after the whole transcript. Requests every field
/// of the profile document; `models::profile::EXPECTED_PROFILE_KEYS` mirrors
/// this list and extraction warns when the model omits one.
pub const PROFILE_SCHEMA_PROMPT: &str = r#"Baseado em toda a nossa conversa até agora, por favor, gere um perfil de carreira detalhado para o aluno no formato JSON.
Inclua os seguintes campos:

- "interesses_principais": string (uma frase concisa resumindo os principais interesses técnicos e temas que surgiram, como áreas de tecnologia, tipos de problemas que gosta de resolver, etc.)
- "objetivos_carreira_inferidos": string (objetivos de carreira de curto ou longo prazo que você inferiu da conversa, mesmo que não tenham sido explicitamente declarados pelo aluno)
- "aspiracoes_declaradas": objeto opcional contendo os seguintes subcampos (se o aluno mencionou explicitamente alguma aspiração, preencha os campos correspondentes; se nenhuma aspiração clara foi declarada, você pode omitir o objeto "aspiracoes_declaradas" ou deixar seus subcampos como null):
    - "empresa_sonhos_mencionada": string (nome da empresa ou tipo de empresa que o aluno mencionou como ideal ou dos sonhos)
    - "cargo_desejado_mencionado": string (nome do cargo ou tipo de papel que o aluno mencionou desejar)
    - "outros_objetivos_claros_mencionados": string (quaisquer outros objetivos de carreira específicos e claros que o aluno verbalizou)
- "soft_skills_identificadas_com_evidencia": array de objetos, onde cada objeto tem os campos {"skill": "nome da skill identificada", "evidencia": "uma frase ou breve resumo da parte da conversa que indica essa skill"}
- "soft_skills_faltantes_para_area": array de objetos, onde cada objeto tem os campos {"skill": "nome da skill necessária para a área", "evidencia": "uma frase ou breve resumo da parte da conversa que indica a falta dessa skill"}
- "hard_skills_mencionadas_ou_desejadas": array de strings (tecnologias específicas, ferramentas, linguagens de programação ou áreas de conhecimento técnico que o aluno mencionou conhecer, ter interesse em aprender, ou que foram inferidas como relevantes)
- "areas_de_potencial_desenvolvimento_sugeridas": string (sugestões concisas de áreas ou habilidades que o aluno poderia focar para desenvolvimento futuro, citando empresas que trabalham com isso, baseado na conversa e nos seus interesses/objetivos)
- "sugestoes_de_carreira_inicial_exploratoria": array de strings (2-3 sugestões de tipos de carreira ou áreas de atuação para o aluno pesquisar mais, e empresas que trabalham com isso, alinhadas com os interesses e skills identificados)
- "observacoes_gerais_sobre_interacao": string (sua análise geral sobre o engajamento do aluno durante a conversa, seu nível de clareza sobre seus objetivos, e quaisquer pontos de atenção ou destaque para um orientador de carreira)

Certifique-se de que a saída seja um objeto JSON válido e completo, começando com '{' e terminando com '}'.
Retorne APENAS o JSON, sem nenhum texto explicativo, markdown, ou qualquer caractere fora do objeto JSON."#;

/// Body of the success response once the profile is extracted and recorded.
pub const PROFILE_READY_MESSAGE: &str = "Seu perfil personalizado foi gerado com sucesso!";
