//! S-1010, S-1200 與 S-2299 的擷取描述檔。

use crate::core::extract::{ColumnSpec, EventDescriptor, Lookup, RowSpec, Source, TableSpec};
use crate::core::schema::*;
use crate::domain::model::EventType;

macro_rules! text {
    ($name:literal) => {
        Source::Node(&[Lookup::Text($name)])
    };
}

// 表頭欄位都取自事件元素
const EVENT_ID_COLUMN: ColumnSpec = ColumnSpec::text(EVENT_ID, Source::Node(&[Lookup::Attr("Id")]));
const SOURCE_COLUMN: ColumnSpec = ColumnSpec::text(SOURCE_FILE, Source::SourceLabel);

pub static RATE_TABLE: EventDescriptor = EventDescriptor {
    event: EventType::RateTable,
    markers: &["evtTabRubrica"],
    header: TableSpec {
        name: HEADER_1010,
        columns: &[
            EVENT_ID_COLUMN,
            ColumnSpec::text(ENVIRONMENT, text!("tpAmb")),
            ColumnSpec::text(EMISSION_PROCESS, text!("procEmi")),
            ColumnSpec::text(PROCESS_VERSION, text!("verProc")),
            ColumnSpec::text(REGISTRATION_TYPE, text!("tpInsc")),
            ColumnSpec::text(REGISTRATION_NUMBER, text!("nrInsc")),
            SOURCE_COLUMN,
        ],
    },
    rows: &[RowSpec {
        table: TableSpec {
            name: RUBRICS_1010,
            columns: &[
                ColumnSpec::text(EVENT_ID, Source::Header(EVENT_ID)),
                ColumnSpec::text(ACTION, Source::ElementName),
                ColumnSpec::text(RUBRIC_CODE, Source::Block("ideRubrica", Lookup::Text("codRubr"))),
                ColumnSpec::text(
                    RUBRIC_TABLE_ID,
                    Source::Block("ideRubrica", Lookup::Text("ideTabRubr")),
                ),
                ColumnSpec::text(VALID_FROM, Source::Block("ideRubrica", Lookup::Text("iniValid"))),
                ColumnSpec::text(VALID_UNTIL, Source::Block("ideRubrica", Lookup::Text("fimValid"))),
                ColumnSpec::text(
                    RUBRIC_DESCRIPTION,
                    Source::Block("dadosRubrica", Lookup::Text("dscRubr")),
                ),
                // 性質代碼含英數字，保留文字
                ColumnSpec::text(RUBRIC_NATURE, Source::Block("dadosRubrica", Lookup::Text("natRubr"))),
                ColumnSpec::numeric(RUBRIC_TYPE, Source::Block("dadosRubrica", Lookup::Text("tpRubr"))),
                ColumnSpec::numeric(
                    INCIDENCE_CP,
                    Source::Block("dadosRubrica", Lookup::Text("codIncCP")),
                ),
                ColumnSpec::numeric(
                    INCIDENCE_IRRF,
                    Source::Block("dadosRubrica", Lookup::Text("codIncIRRF")),
                ),
                ColumnSpec::numeric(
                    INCIDENCE_FGTS,
                    Source::Block("dadosRubrica", Lookup::Text("codIncFGTS")),
                ),
                SOURCE_COLUMN,
            ],
        },
        elements: &["inclusao", "alteracao", "exclusao"],
        within: None,
        required: &["ideRubrica"],
        children: &[],
    }],
};

pub static COMPENSATION: EventDescriptor = EventDescriptor {
    event: EventType::Compensation,
    markers: &["evtRemun", "evt1200"],
    header: TableSpec {
        name: HEADER_1200,
        columns: &[
            EVENT_ID_COLUMN,
            ColumnSpec::text(PERIOD, text!("perApur")),
            ColumnSpec::text(RECTIFICATION, text!("indRetif")),
            ColumnSpec::text(ENVIRONMENT, text!("tpAmb")),
            ColumnSpec::padded(WORKER_CPF, text!("cpfTrab"), CPF_WIDTH),
            SOURCE_COLUMN,
        ],
    },
    rows: &[RowSpec {
        table: TableSpec {
            name: DECLARATIONS_1200,
            columns: &[
                ColumnSpec::text(DECLARATION_ID, text!("ideDmDev")),
                ColumnSpec::text(EVENT_ID, Source::Header(EVENT_ID)),
                ColumnSpec::text(PERIOD, Source::Header(PERIOD)),
                ColumnSpec::text(WORKER_CPF, Source::Header(WORKER_CPF)),
                ColumnSpec::numeric(CATEGORY, text!("codCateg")),
                ColumnSpec::padded(
                    ENROLLMENT,
                    Source::Block("ideEstabLot", Lookup::Text("matricula")),
                    ENROLLMENT_WIDTH,
                ),
                ColumnSpec::text(LOCATION, Source::Block("ideEstabLot", Lookup::ChildText("codLotacao"))),
                SOURCE_COLUMN,
            ],
        },
        elements: &["dmDev"],
        within: None,
        required: &["ideEstabLot"],
        children: &[RowSpec {
            table: TableSpec {
                name: RUBRICS_1200,
                columns: &[
                    ColumnSpec::text(DECLARATION_ID, Source::Parent(DECLARATION_ID)),
                    ColumnSpec::text(PERIOD, Source::Header(PERIOD)),
                    ColumnSpec::text(WORKER_CPF, Source::Header(WORKER_CPF)),
                    ColumnSpec::text(ENROLLMENT, Source::Parent(ENROLLMENT)),
                    ColumnSpec::text(RUBRIC_CODE, text!("codRubr")),
                    ColumnSpec::text(RUBRIC_TABLE_ID, text!("ideTabRubr")),
                    ColumnSpec::numeric(QUANTITY, text!("qtdRubr")),
                    ColumnSpec::numeric(AMOUNT, text!("vrRubr")),
                    ColumnSpec::text(IR_INDICATOR, text!("indApurIR")),
                    SOURCE_COLUMN,
                ],
            },
            elements: &["itensRemun"],
            within: Some("ideEstabLot"),
            required: &[],
            children: &[],
        }],
    }],
};

pub static TERMINATION: EventDescriptor = EventDescriptor {
    event: EventType::Termination,
    markers: &["evtDeslig"],
    header: TableSpec {
        name: HEADER_2299,
        columns: &[
            EVENT_ID_COLUMN,
            ColumnSpec::text(TERMINATION_DATE, text!("dtDeslig")),
            ColumnSpec::text(TERMINATION_REASON, text!("mtvDeslig")),
            ColumnSpec::text(RECTIFICATION, text!("indRetif")),
            ColumnSpec::text(ENVIRONMENT, text!("tpAmb")),
            ColumnSpec::padded(WORKER_CPF, text!("cpfTrab"), CPF_WIDTH),
            SOURCE_COLUMN,
        ],
    },
    rows: &[RowSpec {
        table: TableSpec {
            name: DECLARATIONS_2299,
            columns: &[
                ColumnSpec::text(
                    DECLARATION_ID,
                    Source::Node(&[
                        Lookup::Attr("id"),
                        Lookup::Attr("Id"),
                        Lookup::Text("ideDmDev"),
                    ]),
                ),
                ColumnSpec::text(EVENT_ID, Source::Header(EVENT_ID)),
                ColumnSpec::text(WORKER_CPF, Source::Header(WORKER_CPF)),
                ColumnSpec::numeric(CATEGORY, text!("codCateg")),
                ColumnSpec::padded(
                    ENROLLMENT,
                    Source::Block("ideEstabLot", Lookup::Text("matricula")),
                    ENROLLMENT_WIDTH,
                ),
                ColumnSpec::text(LOCATION, Source::Block("ideEstabLot", Lookup::ChildText("codLotacao"))),
                SOURCE_COLUMN,
            ],
        },
        elements: &["dmDev"],
        within: None,
        required: &["ideEstabLot"],
        children: &[RowSpec {
            table: TableSpec {
                name: RUBRICS_2299,
                columns: &[
                    ColumnSpec::text(DECLARATION_ID, Source::Parent(DECLARATION_ID)),
                    ColumnSpec::text(TERMINATION_DATE, Source::Header(TERMINATION_DATE)),
                    ColumnSpec::text(WORKER_CPF, Source::Header(WORKER_CPF)),
                    ColumnSpec::text(ENROLLMENT, Source::Parent(ENROLLMENT)),
                    ColumnSpec::text(RUBRIC_CODE, text!("codRubr")),
                    ColumnSpec::text(RUBRIC_TABLE_ID, text!("ideTabRubr")),
                    ColumnSpec::numeric(QUANTITY, text!("qtdRubr")),
                    ColumnSpec::numeric(AMOUNT, text!("vrRubr")),
                    ColumnSpec::text(IR_INDICATOR, text!("indApurIR")),
                    SOURCE_COLUMN,
                ],
            },
            elements: &["detVerbas"],
            within: Some("ideEstabLot"),
            required: &[],
            children: &[],
        }],
    }],
};

pub fn descriptor_for(event: &EventType) -> Option<&'static EventDescriptor> {
    match event {
        EventType::RateTable => Some(&RATE_TABLE),
        EventType::Compensation => Some(&COMPENSATION),
        EventType::Termination => Some(&TERMINATION),
        EventType::Other(_) | EventType::Unknown => None,
    }
}
