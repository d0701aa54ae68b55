// 領域層：事件與表格模型，以及儲存、配置與管道的介面

pub mod model;
pub mod ports;
pub mod table;
