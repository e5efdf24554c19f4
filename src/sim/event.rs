//! 事件 trait
//!
//! 仿真事件（包裹到达、服务完成等）的统一接口。

use super::simulator::Simulator;
use super::world::World;

/// 可被调度执行的事件。执行时按值取得自身（`self: Box<Self>`），
/// 可以把携带的数据移交给世界或后续事件。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}
