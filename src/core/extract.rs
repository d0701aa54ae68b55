//! 以描述檔驅動的欄位擷取。
//!
//! 每種事件以一份 [`EventDescriptor`] 描述表頭與巢狀的明細列。
//! [`Extractor`] 依描述檔走訪文件並產生對應的表格。

use crate::core::events;
use crate::core::xml::{Node, XmlDocument};
use crate::domain::model::EventType;
use crate::domain::table::{Table, TableSet, Value};
use crate::utils::error::{EtlError, Result};

/// 在單一元素上取值的方式
#[derive(Debug, Clone, Copy)]
pub enum Lookup {
    Attr(&'static str),
    /// 第一個同名後代的文字
    Text(&'static str),
    /// 直接子元素的文字
    ChildText(&'static str),
}

impl Lookup {
    fn resolve(&self, node: Node<'_>) -> String {
        match self {
            Lookup::Attr(name) => node.attr(name).unwrap_or_default().trim().to_string(),
            Lookup::Text(name) => node.find_text(name),
            Lookup::ChildText(name) => node.child_text(name),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Source {
    /// 目前元素的名稱，例如 `inclusao`
    ElementName,
    SourceLabel,
    /// 依序嘗試，取第一個非空值
    Node(&'static [Lookup]),
    /// 在第一個同名子區塊內取值；區塊不存在時為空字串
    Block(&'static str, Lookup),
    /// 沿用表頭列的欄位
    Header(&'static str),
    /// 沿用上層列的欄位
    Parent(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
    /// 左側補零至固定寬度
    Padded(usize),
}

#[derive(Debug)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub source: Source,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn text(label: &'static str, source: Source) -> Self {
        Self {
            label,
            source,
            kind: ColumnKind::Text,
        }
    }

    pub const fn numeric(label: &'static str, source: Source) -> Self {
        Self {
            label,
            source,
            kind: ColumnKind::Numeric,
        }
    }

    pub const fn padded(label: &'static str, source: Source, width: usize) -> Self {
        Self {
            label,
            source,
            kind: ColumnKind::Padded(width),
        }
    }
}

#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    pub fn empty_table(&self) -> Table {
        Table::new(self.name, self.columns.iter().map(|c| c.label))
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }
}

/// 每個符合 `elements` 的元素產生一列
#[derive(Debug)]
pub struct RowSpec {
    pub table: TableSpec,
    /// 依序走訪的元素名稱，每個名稱為一組
    pub elements: &'static [&'static str],
    /// 只在上層元素的此區塊內搜尋
    pub within: Option<&'static str>,
    /// 每個元素必須包含的區塊，缺少時整份文件失敗
    pub required: &'static [&'static str],
    pub children: &'static [RowSpec],
}

#[derive(Debug)]
pub struct EventDescriptor {
    pub event: EventType,
    pub markers: &'static [&'static str],
    pub header: TableSpec,
    pub rows: &'static [RowSpec],
}

impl EventDescriptor {
    /// 依輸出順序列出所有表格規格
    pub fn table_specs(&self) -> Vec<&TableSpec> {
        fn walk<'d>(rows: &'d [RowSpec], out: &mut Vec<&'d TableSpec>) {
            for row in rows {
                out.push(&row.table);
                walk(row.children, out);
            }
        }

        let mut out = vec![&self.header];
        walk(self.rows, &mut out);
        out
    }

    pub fn table_names(&self) -> Vec<&'static str> {
        self.table_specs().iter().map(|spec| spec.name).collect()
    }
}

#[derive(Clone, Copy)]
struct RowRef<'r> {
    spec: &'r TableSpec,
    values: &'r [Value],
}

impl RowRef<'_> {
    fn get(&self, label: &str) -> Value {
        self.spec
            .position(label)
            .map_or(Value::Missing, |i| self.values[i].clone())
    }
}

struct Context<'r> {
    descriptor: &'r EventDescriptor,
    label: &'r str,
    header: Option<RowRef<'r>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    descriptor: &'static EventDescriptor,
}

impl Extractor {
    pub fn new(descriptor: &'static EventDescriptor) -> Self {
        Self { descriptor }
    }

    /// 只有三種支援的事件有對應的擷取器
    pub fn for_event(event: &EventType) -> Option<Self> {
        events::descriptor_for(event).map(Self::new)
    }

    pub fn descriptor(&self) -> &'static EventDescriptor {
        self.descriptor
    }

    pub fn extract(&self, bytes: &[u8], source_label: &str) -> Result<TableSet> {
        let descriptor = self.descriptor;
        let doc = XmlDocument::parse(bytes)?;
        let event_node =
            doc.root()
                .find_any(descriptor.markers)
                .ok_or_else(|| EtlError::StructureError {
                    event: descriptor.event.code().to_string(),
                    element: descriptor.markers.join("/"),
                })?;

        let mut tables: Vec<Table> = descriptor
            .table_specs()
            .iter()
            .map(|spec| spec.empty_table())
            .collect();

        let mut ctx = Context {
            descriptor,
            label: source_label,
            header: None,
        };
        let header_values = build_row(&descriptor.header, event_node, &ctx, None);

        ctx.header = Some(RowRef {
            spec: &descriptor.header,
            values: &header_values,
        });
        for spec in descriptor.rows {
            collect_rows(spec, event_node, &ctx, None, &mut tables)?;
        }

        push_to(&mut tables, descriptor.header.name, header_values.clone())?;

        tracing::debug!(
            "Extracted {} from {}: {}",
            descriptor.event,
            source_label,
            tables
                .iter()
                .map(|t| format!("{}={}", t.name(), t.len()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut set = TableSet::new();
        for table in tables {
            set.insert(table);
        }
        Ok(set)
    }
}

/// 依事件類型擷取；不支援的類型回傳錯誤
pub fn extract(event: &EventType, bytes: &[u8], source_label: &str) -> Result<TableSet> {
    let extractor = Extractor::for_event(event).ok_or_else(|| {
        EtlError::processing(format!("no extractor for event type {}", event))
    })?;
    extractor.extract(bytes, source_label)
}

fn collect_rows(
    spec: &RowSpec,
    scope: Node<'_>,
    ctx: &Context<'_>,
    parent: Option<RowRef<'_>>,
    tables: &mut Vec<Table>,
) -> Result<()> {
    let base = match spec.within {
        Some(block) => match scope.find(block) {
            Some(node) => node,
            None => return Ok(()),
        },
        None => scope,
    };

    for element in spec.elements {
        for node in base.find_all(element) {
            if let Some(missing) = spec.required.iter().find(|name| node.find(name).is_none()) {
                return Err(EtlError::StructureError {
                    event: ctx.descriptor.event.code().to_string(),
                    element: (*missing).to_string(),
                });
            }

            let values = build_row(&spec.table, node, ctx, parent);
            let current = RowRef {
                spec: &spec.table,
                values: &values,
            };
            for child in spec.children {
                collect_rows(child, node, ctx, Some(current), tables)?;
            }
            push_to(tables, spec.table.name, values)?;
        }
    }

    Ok(())
}

fn build_row(
    spec: &TableSpec,
    node: Node<'_>,
    ctx: &Context<'_>,
    parent: Option<RowRef<'_>>,
) -> Vec<Value> {
    spec.columns
        .iter()
        .map(|column| {
            let raw = match column.source {
                Source::ElementName => node.local_name().to_string(),
                Source::SourceLabel => ctx.label.to_string(),
                Source::Node(lookups) => lookups
                    .iter()
                    .map(|lookup| lookup.resolve(node))
                    .find(|value| !value.is_empty())
                    .unwrap_or_default(),
                Source::Block(block, lookup) => node
                    .find(block)
                    .map(|b| lookup.resolve(b))
                    .unwrap_or_default(),
                Source::Header(label) => {
                    return ctx.header.map_or(Value::Missing, |row| row.get(label));
                }
                Source::Parent(label) => {
                    return parent.map_or(Value::Missing, |row| row.get(label));
                }
            };

            match column.kind {
                ColumnKind::Text => Value::Text(raw),
                ColumnKind::Numeric => Value::parse_number(&raw),
                ColumnKind::Padded(width) => Value::Text(zero_pad(&raw, width)),
            }
        })
        .collect()
}

fn push_to(tables: &mut [Table], name: &str, values: Vec<Value>) -> Result<()> {
    match tables.iter_mut().find(|t| t.name() == name) {
        Some(table) => table.push_row(values),
        None => Err(EtlError::processing(format!("unknown table '{}'", name))),
    }
}

/// 與 `str.zfill` 相同：不足寬度時左側補零，超過時保留原值
pub fn zero_pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{}{}", "0".repeat(width - len), value)
    }
}
