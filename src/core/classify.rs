use crate::core::xml::{Node, XmlDocument};
use crate::domain::model::EventType;
use regex::Regex;
use std::sync::LazyLock;

const RATE_TABLE_MARKERS: &[&str] = &["evtTabRubrica"];
const COMPENSATION_MARKERS: &[&str] = &["evtRemun", "evt1200"];
const TERMINATION_MARKERS: &[&str] = &["evtDeslig"];

static EVENT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"S-(\d+)").expect("event code pattern is valid"));

/// 判斷文件的事件類型；無法解析的內容一律回傳 `Unknown`
pub fn classify(bytes: &[u8]) -> EventType {
    match XmlDocument::parse(bytes) {
        Ok(doc) => {
            let event = classify_root(doc.root());
            tracing::debug!("Classified document as {}", event);
            event
        }
        Err(e) => {
            tracing::debug!("Document could not be parsed, treating as UNKNOWN: {}", e);
            EventType::Unknown
        }
    }
}

fn classify_root(root: Node<'_>) -> EventType {
    if root.find_any(RATE_TABLE_MARKERS).is_some() {
        return EventType::RateTable;
    }
    if root.find_any(COMPENSATION_MARKERS).is_some() {
        return EventType::Compensation;
    }
    // 只有 Id 帶事件代碼時才採用，否則繼續往下判斷
    if let Some(code) = root
        .find_with_attr("Id")
        .and_then(|node| node.attr("Id"))
        .and_then(event_code_from_id)
    {
        return EventType::Other(code);
    }
    if root.find_any(TERMINATION_MARKERS).is_some() {
        return EventType::Termination;
    }
    EventType::Unknown
}

/// 從 Id 中取出最後一個 `S-` 之後的完整數字，不足四位數時補零
pub fn event_code_from_id(id: &str) -> Option<String> {
    EVENT_CODE
        .captures_iter(id)
        .last()
        .map(|caps| format!("S-{:0>4}", &caps[1]))
}
