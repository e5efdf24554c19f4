//! 世界 trait
//!
//! 事件执行时可变访问的业务状态（例如分拣中心的队列与记录）。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由业务层实现，事件通过 `as_any_mut` 向下转型取得具体类型。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每个事件执行后调用一次。
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
