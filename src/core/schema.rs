//! 擷取、調和、關聯與匯出共用的表格名稱與欄位標籤。

pub const HEADER_1010: &str = "CABECALHO_1010";
pub const RUBRICS_1010: &str = "RUBRICAS_1010";
pub const HEADER_1200: &str = "CABECALHO_1200";
pub const DECLARATIONS_1200: &str = "DEMONSTRATIVO_1200";
pub const RUBRICS_1200: &str = "RUBRICAS_1200";
pub const HEADER_2299: &str = "CABECALHO_2299";
pub const DECLARATIONS_2299: &str = "DEMONSTRATIVO_2299";
pub const RUBRICS_2299: &str = "RUBRICAS_2299";
pub const RUBRICS_2299_HARMONIZED: &str = "RUBRICAS_2299_HARMONIZADO";
pub const RUBRICS_ENRICHED: &str = "RUBRICAS_1200_2299_ENRIQUECIDO";
/// 合併表在活頁簿中使用的工作表名稱
pub const RUBRICS_ENRICHED_SHEET: &str = "RUBRICAS_1200_2299";

/// 試算表工作表名稱的長度上限
pub const MAX_SHEET_NAME_LEN: usize = 31;

pub const EVENT_ID: &str = "ID Evento";
pub const ENVIRONMENT: &str = "Tipo Ambiente";
pub const EMISSION_PROCESS: &str = "Processo Emissão";
pub const PROCESS_VERSION: &str = "Versão Processo";
pub const REGISTRATION_TYPE: &str = "Tipo Inscrição";
pub const REGISTRATION_NUMBER: &str = "Nº Inscrição";
pub const SOURCE_FILE: &str = "Origem Arquivo";

pub const ACTION: &str = "Ação";
pub const RUBRIC_CODE: &str = "Código Rubrica";
pub const RUBRIC_TABLE_ID: &str = "ID Tabela Rubrica";
pub const VALID_FROM: &str = "Início Vigência";
pub const VALID_UNTIL: &str = "Fim Vigência";
pub const RUBRIC_DESCRIPTION: &str = "Descrição Rubrica";
pub const RUBRIC_NATURE: &str = "Natureza Rubrica";
pub const RUBRIC_TYPE: &str = "Tipo Rubrica";
pub const INCIDENCE_CP: &str = "Incidência INSS";
pub const INCIDENCE_IRRF: &str = "Incidência IRRF";
pub const INCIDENCE_FGTS: &str = "Incidência FGTS";

pub const PERIOD: &str = "Período Apuração";
pub const RECTIFICATION: &str = "Ind Retificação";
pub const WORKER_CPF: &str = "CPF Trabalhador";
pub const DECLARATION_ID: &str = "ID Demonstrativo";
pub const CATEGORY: &str = "Código Categoria";
pub const ENROLLMENT: &str = "Matrícula";
pub const LOCATION: &str = "Código Lotação";
pub const QUANTITY: &str = "Quantidade";
pub const AMOUNT: &str = "Valor Rubrica (R$)";
pub const IR_INDICATOR: &str = "Ind Apur IR";

pub const TERMINATION_DATE: &str = "Data Desligamento";
pub const TERMINATION_REASON: &str = "Motivo Desligamento (código)";

pub const CPF_WIDTH: usize = 11;
pub const ENROLLMENT_WIDTH: usize = 8;

/// S-1200 明細欄位順序；S-2299 明細調整後依此排列
pub const COMPENSATION_LINE_COLUMNS: [&str; 10] = [
    DECLARATION_ID,
    PERIOD,
    WORKER_CPF,
    ENROLLMENT,
    RUBRIC_CODE,
    RUBRIC_TABLE_ID,
    QUANTITY,
    AMOUNT,
    IR_INDICATOR,
    SOURCE_FILE,
];

/// 截斷為合法的工作表名稱（以字元計）
pub fn sheet_name(table_name: &str) -> String {
    table_name.chars().take(MAX_SHEET_NAME_LEN).collect()
}
