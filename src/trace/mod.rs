//! 分拣中心事件跟踪（用于离线回放）
//!
//! 事件驱动运行时按发生顺序记录包裹的到达、开始服务与离开，
//! 结束后整体序列化为 JSON 数组，第一条为 `meta`。

mod types;

pub use types::{TraceEvent, TraceEventKind, TraceLogger};
