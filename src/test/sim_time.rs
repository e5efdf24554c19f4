use crate::sim::SimTime;

#[test]
fn sim_time_unit_conversions() {
    assert_eq!(SimTime::from_hours(1.5), SimTime(1.5));
    assert_eq!(SimTime::from_minutes(30.0), SimTime(0.5));
    assert_eq!(SimTime(2.25).as_hours(), 2.25);
}

#[test]
fn sim_time_orders_totally() {
    let mut times = vec![SimTime(3.0), SimTime::ZERO, SimTime(1.5), SimTime(1.5)];
    times.sort();
    assert_eq!(times, vec![SimTime::ZERO, SimTime(1.5), SimTime(1.5), SimTime(3.0)]);
    assert_eq!(SimTime(1.0).max(SimTime(2.0)), SimTime(2.0));
    assert!(SimTime(0.1) < SimTime(0.2));
}

#[test]
fn sim_time_adds_durations() {
    assert_eq!(SimTime(1.0) + 0.5, SimTime(1.5));
    assert_eq!(SimTime::ZERO + 0.0, SimTime::ZERO);
}
