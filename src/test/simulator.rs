use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;

/// 记录事件执行顺序的世界
#[derive(Default)]
struct LogWorld {
    log: Vec<(f64, &'static str)>,
    ticks: usize,
}

impl World for LogWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks += 1;
    }
}

fn log_world(world: &mut dyn World) -> &mut LogWorld {
    world
        .as_any_mut()
        .downcast_mut::<LogWorld>()
        .expect("world must be LogWorld")
}

struct Mark(&'static str);

impl Event for Mark {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        log_world(world).log.push((sim.now().0, self.0));
    }
}

/// 执行时在 `delay` 之后再调度一个 `Mark`
struct MarkThen {
    label: &'static str,
    next: &'static str,
    delay: f64,
}

impl Event for MarkThen {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        log_world(world).log.push((sim.now().0, self.label));
        sim.schedule(sim.now() + self.delay, Mark(self.next));
    }
}

#[test]
fn events_run_in_time_order_with_fifo_ties() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(2.5), Mark("late"));
    sim.schedule(SimTime(0.25), Mark("early"));
    sim.schedule(SimTime(2.5), Mark("late-second"));
    assert_eq!(sim.pending(), 3);

    let mut world = LogWorld::default();
    sim.run(&mut world);

    assert_eq!(
        world.log,
        vec![(0.25, "early"), (2.5, "late"), (2.5, "late-second")]
    );
    assert_eq!(world.ticks, 3);
    assert_eq!(sim.now(), SimTime(2.5));
    assert_eq!(sim.pending(), 0);
}

#[test]
fn event_scheduled_for_now_runs_after_current_event() {
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(1.0),
        MarkThen {
            label: "arrive",
            next: "start",
            delay: 0.0,
        },
    );
    sim.schedule(SimTime(1.0), Mark("other-arrival"));

    let mut world = LogWorld::default();
    sim.run(&mut world);

    assert_eq!(
        world.log,
        vec![(1.0, "arrive"), (1.0, "other-arrival"), (1.0, "start")]
    );
}

#[test]
fn chained_events_advance_the_clock() {
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime::ZERO,
        MarkThen {
            label: "start",
            next: "done",
            delay: 0.75,
        },
    );

    let mut world = LogWorld::default();
    sim.run(&mut world);

    assert_eq!(world.log, vec![(0.0, "start"), (0.75, "done")]);
    assert_eq!(sim.now(), SimTime(0.75));
}

#[test]
fn run_until_stops_before_later_events_and_resumes() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(1.0), Mark("a"));
    sim.schedule(SimTime(5.0), Mark("b"));
    sim.schedule(SimTime(9.0), Mark("c"));

    let mut world = LogWorld::default();
    sim.run_until(SimTime(5.0), &mut world);
    assert_eq!(world.log, vec![(1.0, "a"), (5.0, "b")]);
    assert_eq!(sim.now(), SimTime(5.0));
    assert_eq!(sim.pending(), 1);

    sim.run(&mut world);
    assert_eq!(world.log.len(), 3);
    assert_eq!(world.ticks, 3);
    assert_eq!(sim.now(), SimTime(9.0));
}

#[test]
fn run_until_advances_clock_without_events() {
    let mut sim = Simulator::default();
    let mut world = LogWorld::default();

    sim.run_until(SimTime(7.5), &mut world);
    assert_eq!(sim.now(), SimTime(7.5));
    assert_eq!(world.ticks, 0);
}
