//! 命名空間無關的 XML 樹與查詢工具。
//!
//! eSocial 文件的元素通常帶有預設命名空間或前綴，這裡一律以 local name
//! 比對，讓欄位對應只需寫元素名稱。

use crate::utils::error::{EtlError, Result};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::bytes::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// 宣告只會出現在文件開頭
const DECLARATION_WINDOW: usize = 256;

static ENCODING_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*<\?xml[^>]*?\sencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("encoding declaration pattern is valid")
});

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<usize>,
}

/// 解析後的文件；元素以索引存放，根元素為 0
#[derive(Debug)]
pub struct XmlDocument {
    elements: Vec<Element>,
}

impl XmlDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let content = decode(bytes)?;

        let mut reader = Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut elements: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root_closed = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                EtlError::xml(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if stack.is_empty() && (root_closed || !elements.is_empty()) {
                        return Err(EtlError::xml("document has more than one root element"));
                    }

                    let id = elements.len();
                    elements.push(open_element(e)?);
                    if let Some(&parent) = stack.last() {
                        elements[parent].children.push(id);
                    }

                    if matches!(event, Event::Start(_)) {
                        stack.push(id);
                    } else if stack.is_empty() {
                        root_closed = true;
                    }
                }
                Event::End(_) => {
                    if stack.pop().is_none() {
                        return Err(EtlError::xml("closing tag without matching opening tag"));
                    }
                    if stack.is_empty() {
                        root_closed = true;
                    }
                }
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|e| EtlError::xml(format!("invalid text content: {}", e)))?;
                    append_text(&mut elements, &stack, &text)?;
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut elements, &stack, &text)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(EtlError::xml(format!(
                "unexpected end of document: <{}> is not closed",
                elements[stack[stack.len() - 1]].name
            )));
        }
        if elements.is_empty() {
            return Err(EtlError::xml("document has no root element"));
        }

        Ok(Self { elements })
    }

    pub fn root(&self) -> Node<'_> {
        Node { doc: self, id: 0 }
    }
}

/// 依 BOM 或 XML 宣告轉成 UTF-8；兩者皆無時視為 UTF-8
fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| EtlError::xml(format!("document is not valid {}", encoding.name())))
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let window = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let caps = ENCODING_DECLARATION.captures(window)?;
    // 沒有 BOM 卻宣告 UTF-16 時，內容其實是 8 位元編碼
    Encoding::for_label(&caps[1]).map(Encoding::output_encoding)
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| EtlError::xml(format!("invalid attribute on <{}>: {}", name, e)))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| EtlError::xml(format!("invalid attribute value on <{}>: {}", name, e)))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn append_text(elements: &mut [Element], stack: &[usize], text: &str) -> Result<()> {
    match stack.last() {
        Some(&id) => {
            elements[id].text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(EtlError::xml("text content outside the root element")),
    }
}

/// 指向文件中某個元素的輕量句柄
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    doc: &'a XmlDocument,
    id: usize,
}

impl<'a> Node<'a> {
    fn element(&self) -> &'a Element {
        &self.doc.elements[self.id]
    }

    pub fn local_name(&self) -> &'a str {
        &self.element().name
    }

    /// 依 local name 取屬性值
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// 元素的字串值：所有後代文字串接並去除首尾空白
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.element().text);
        for child in self.children() {
            child.collect_text(out);
        }
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let doc = self.doc;
        self.element()
            .children
            .iter()
            .map(move |&id| Node { doc, id })
    }

    /// 依文件順序列出所有後代（不含自身）
    pub fn descendants(&self) -> Vec<Node<'a>> {
        let mut out = Vec::new();
        let mut pending: Vec<Node<'a>> = self.children().collect();
        pending.reverse();
        while let Some(node) = pending.pop() {
            out.push(node);
            let mark = pending.len();
            pending.extend(node.children());
            pending[mark..].reverse();
        }
        out
    }

    pub fn find(&self, name: &str) -> Option<Node<'a>> {
        self.descendants()
            .into_iter()
            .find(|n| n.local_name() == name)
    }

    pub fn find_all(&self, name: &str) -> Vec<Node<'a>> {
        self.descendants()
            .into_iter()
            .filter(|n| n.local_name() == name)
            .collect()
    }

    /// 第一個符合元素的文字，找不到時為空字串
    pub fn find_text(&self, name: &str) -> String {
        self.find(name).map(|n| n.text()).unwrap_or_default()
    }

    pub fn child(&self, name: &str) -> Option<Node<'a>> {
        self.children().find(|n| n.local_name() == name)
    }

    pub fn child_text(&self, name: &str) -> String {
        self.child(name).map(|n| n.text()).unwrap_or_default()
    }

    /// 自身或後代中第一個名稱屬於 `names` 的元素
    pub fn find_any(&self, names: &[&str]) -> Option<Node<'a>> {
        if names.contains(&self.local_name()) {
            return Some(*self);
        }
        self.descendants()
            .into_iter()
            .find(|n| names.contains(&n.local_name()))
    }

    /// 自身或後代中第一個帶有指定屬性的元素
    pub fn find_with_attr(&self, attr: &str) -> Option<Node<'a>> {
        if self.has_attr(attr) {
            return Some(*self);
        }
        self.descendants().into_iter().find(|n| n.has_attr(attr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<eSocial xmlns="http://www.esocial.gov.br/schema/evt/evtRemun/v_S_01_02_00">
  <ns:evtRemun xmlns:ns="urn:x" ns:Id="ID100">
    <ns:ideEvento><ns:perApur> 2024-03 </ns:perApur></ns:ideEvento>
    <ns:dmDev><ns:ideDmDev>A</ns:ideDmDev></ns:dmDev>
    <ns:dmDev><ns:ideDmDev>B</ns:ideDmDev><ns:obs><![CDATA[x & y]]></ns:obs></ns:dmDev>
    <ns:nota>R&amp;D</ns:nota>
  </ns:evtRemun>
</eSocial>"#;

    #[test]
    fn test_lookup_ignores_namespace_prefixes() {
        let doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        let root = doc.root();
        assert_eq!(root.local_name(), "eSocial");

        let evt = root.find("evtRemun").unwrap();
        assert_eq!(evt.attr("Id"), Some("ID100"));
        assert_eq!(evt.find_text("perApur"), "2024-03");
        assert_eq!(evt.find_text("nota"), "R&D");
        assert_eq!(evt.find_text("missing"), "");
    }

    #[test]
    fn test_find_all_in_document_order() {
        let doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<String> = doc
            .root()
            .find_all("dmDev")
            .iter()
            .map(|n| n.find_text("ideDmDev"))
            .collect();
        assert_eq!(ids, vec!["A", "B"]);

        let names: Vec<&str> = doc
            .root()
            .descendants()
            .iter()
            .map(|n| n.local_name())
            .collect();
        assert_eq!(
            names,
            vec!["evtRemun", "ideEvento", "perApur", "dmDev", "ideDmDev", "dmDev", "ideDmDev", "obs", "nota"]
        );
    }

    #[test]
    fn test_child_only_searches_direct_children() {
        let xml = b"<a><b><c>deep</c></b><c>direct</c></a>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.root().child_text("c"), "direct");
        assert_eq!(doc.root().find_text("c"), "deep");
        assert_eq!(doc.root().find_text("obs"), "");
    }

    #[test]
    fn test_cdata_and_string_value() {
        let doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        let second = doc.root().find_all("dmDev")[1];
        assert_eq!(second.find_text("obs"), "x & y");
        assert_eq!(second.text(), "Bx & y");
    }

    #[test]
    fn test_find_any_includes_self() {
        let doc = XmlDocument::parse(b"<evtDeslig Id=\"X\"><a/></evtDeslig>").unwrap();
        let found = doc.root().find_any(&["evtDeslig"]).unwrap();
        assert_eq!(found.local_name(), "evtDeslig");
        assert_eq!(doc.root().find_with_attr("Id").unwrap().attr("Id"), Some("X"));
    }

    #[test]
    fn test_latin1_declaration_is_decoded() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
<eSocial><evtTabRubrica Id=\"ID1\"><dscRubr>Sal\xe1rio</dscRubr></evtTabRubrica></eSocial>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.root().find_text("dscRubr"), "Salário");
    }

    #[test]
    fn test_byte_order_marks_are_honored() {
        let xml = r#"<?xml version="1.0" encoding="UTF-16"?><a><b>Salário</b></a>"#;

        let mut utf16 = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            utf16.extend(unit.to_le_bytes());
        }
        let doc = XmlDocument::parse(&utf16).unwrap();
        assert_eq!(doc.root().find_text("b"), "Salário");

        let mut utf8 = b"\xef\xbb\xbf".to_vec();
        utf8.extend(xml.replace("UTF-16", "UTF-8").as_bytes());
        let doc = XmlDocument::parse(&utf8).unwrap();
        assert_eq!(doc.root().find_text("b"), "Salário");
    }

    #[test]
    fn test_utf16_declaration_without_bom_reads_as_utf8() {
        let xml = r#"<?xml version="1.0" encoding="UTF-16"?><a>ação</a>"#;
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.root().text(), "ação");
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        let cases: [&[u8]; 7] = [
            b"",
            b"not xml at all",
            b"<a><b></a>",
            b"<a><b>truncated",
            b"<a/><b/>",
            b"<a/>trailing",
            b"<a>\xff</a>",
        ];
        for case in cases {
            assert!(
                XmlDocument::parse(case).is_err(),
                "expected failure for {:?}",
                String::from_utf8_lossy(case)
            );
        }
    }
}
