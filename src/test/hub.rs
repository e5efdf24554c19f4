use super::seeded;
use crate::error::HubSimError;
use crate::queue::{
    ArrivalMode, HubWorkload, HubWorld, QueueParams, compute_records, generate, replay,
};
use crate::sim::{SimTime, Simulator};
use crate::trace::TraceEventKind;

fn rates() -> QueueParams {
    QueueParams::new(2.0, 4.0, 10.0)
}

fn workload(arrivals: &[f64], services: &[f64]) -> HubWorkload {
    HubWorkload {
        arrivals: arrivals.to_vec(),
        services: services.to_vec(),
    }
}

#[test]
fn event_driven_replay_matches_recurrence_exactly() {
    for seed in 0..5 {
        for mode in [ArrivalMode::default(), ArrivalMode::Sequential] {
            let params = QueueParams::new(5.5, 6.0, 300.0).with_arrivals(mode);
            let w = HubWorkload::draw(&params, &mut seeded(seed)).expect("workload");
            let expected = compute_records(&w.arrivals, &w.services).expect("records");

            let out = replay(w, &params, false).expect("replay");
            assert_eq!(out.records, expected);
            assert_eq!(out.stats.parcels_served, expected.len());
            assert!(out.trace.is_none());

            // 同一种子下与 generate 一致
            let generated = generate(&params, &mut seeded(seed)).expect("generate");
            assert_eq!(out.records, generated);
        }
    }
}

#[test]
fn replay_handles_ties_between_arrival_and_departure() {
    // 第二个包裹恰好在第一个离开时到达
    let out = replay(workload(&[1.0, 3.0, 3.0], &[2.0, 1.0, 1.0]), &rates(), false).expect("replay");
    let waits: Vec<f64> = out.records.iter().map(|r| r.waiting_time).collect();
    assert_eq!(waits, vec![0.0, 0.0, 1.0]);
    assert_eq!(
        out.records,
        compute_records(&[1.0, 3.0, 3.0], &[2.0, 1.0, 1.0]).expect("records")
    );
}

#[test]
fn hub_stats_track_queue_length() {
    // 三个包裹同时排队：t=0 开始服务 #0，#1 #2 等待
    let out = replay(workload(&[0.0, 0.5, 1.0], &[2.0, 1.0, 1.0]), &rates(), false).expect("replay");
    let stats = out.stats;
    assert_eq!(stats.parcels_served, 3);
    assert_eq!(stats.max_queue_len, 2);
    // 3 次到达 + 3 次服务完成
    assert_eq!(stats.events, 6);
    // 排队面积：[0.5,1) 1 个，[1,2) 2 个，[2,3) 1 个 => 0.5 + 2 + 1 = 3.5，终止于 t=4
    assert!((stats.time_avg_queue_len - 3.5 / 4.0).abs() < 1e-12);
}

#[test]
fn trace_records_arrive_start_depart_in_order() {
    let mut world = HubWorld::new(workload(&[1.0, 1.5], &[1.0, 0.25]))
        .expect("world")
        .with_trace();
    world.emit_trace_meta(2.0, 4.0);

    let mut sim = Simulator::default();
    world.start(&mut sim);
    sim.run(&mut world);
    assert_eq!(sim.now(), SimTime(2.25));
    assert!(!world.is_busy());
    assert_eq!(world.queue_len(), 0);

    let events = &world.trace.as_ref().expect("trace enabled").events;
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e.kind {
            TraceEventKind::Meta { .. } => "meta",
            TraceEventKind::Arrive { .. } => "arrive",
            TraceEventKind::StartService { .. } => "start_service",
            TraceEventKind::Depart { .. } => "depart",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "meta",
            "arrive",
            "start_service",
            "arrive",
            "depart",
            "start_service",
            "depart"
        ]
    );
    assert_eq!(
        events[0].kind,
        TraceEventKind::Meta {
            arrival_rate: 2.0,
            service_rate: 4.0,
            parcels: 2
        }
    );
    assert_eq!(
        events[3].kind,
        TraceEventKind::Arrive {
            queue_len: 0,
            server_busy: true
        }
    );
    assert_eq!(events[5].parcel, Some(1));
    assert_eq!(
        events[5].kind,
        TraceEventKind::StartService {
            waited: 0.5,
            service_duration: 0.25
        }
    );
}

#[test]
fn hub_world_rejects_malformed_workloads() {
    assert!(matches!(
        HubWorld::new(workload(&[1.0, 2.0], &[1.0])),
        Err(HubSimError::InvalidParameter {
            name: "service_durations",
            ..
        })
    ));
    assert!(matches!(
        HubWorld::new(workload(&[2.0, 1.0], &[1.0, 1.0])),
        Err(HubSimError::InvalidParameter {
            name: "arrival_time",
            ..
        })
    ));
    assert!(matches!(
        HubWorld::new(workload(&[1.0], &[-1.0])),
        Err(HubSimError::InvalidParameter {
            name: "service_duration",
            ..
        })
    ));
}

#[test]
fn empty_workload_replays_to_nothing() {
    let out = replay(HubWorkload::default(), &rates(), true).expect("replay");
    assert!(out.records.is_empty());
    assert_eq!(out.stats.events, 0);
    assert_eq!(out.stats.time_avg_queue_len, 0.0);
    let events = out.trace.expect("trace enabled").events;
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].kind, TraceEventKind::Meta { parcels: 0, .. }));
}

#[test]
fn replay_trace_starts_with_meta() {
    let out = replay(workload(&[1.0, 2.0], &[0.5, 0.5]), &rates(), true).expect("replay");
    let events = out.trace.expect("trace enabled").events;
    assert_eq!(events.len(), 1 + 3 * 2);
    assert_eq!(events[0].t, 0.0);
    assert_eq!(events[0].parcel, None);
    assert_eq!(
        events[0].kind,
        TraceEventKind::Meta {
            arrival_rate: 2.0,
            service_rate: 4.0,
            parcels: 2
        }
    );
    assert!(
        events[1..]
            .iter()
            .all(|e| !matches!(e.kind, TraceEventKind::Meta { .. }))
    );

    let untraced = replay(workload(&[1.0, 2.0], &[0.5, 0.5]), &rates(), false).expect("replay");
    assert!(untraced.trace.is_none());
    assert_eq!(untraced.records, out.records);
}
