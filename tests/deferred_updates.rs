use std::time::Duration;

use futures::future::join_all;
use pretty_assertions::assert_eq;
use rstest::rstest;
use stale_counter::counter::{self, Counter, Mounted, Variant, INITIAL_COUNT, MOUNT_DELAY};
use stale_counter::scenario::{self, Mode};
use stale_counter::state::{ActivityKind, ActivityLog};
use tokio::task::LocalSet;

const DELAY: Duration = Duration::from_millis(1000);

fn fresh(variant: Variant) -> Box<dyn Counter> {
    counter::create(variant, ActivityLog::new())
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(10)]
#[tokio::test(start_paused = true)]
async fn stale_overlapping_updates_add_only_one(#[case] n: usize) {
    LocalSet::new()
        .run_until(async move {
            let counter = fresh(Variant::Stale);

            let handles: Vec<_> = (0..n).map(|_| counter.schedule(DELAY)).collect();
            join_all(handles).await;

            assert_eq!(counter.count(), INITIAL_COUNT + 1);
        })
        .await;
}

#[rstest]
#[case(Variant::Functional, 0)]
#[case(Variant::Functional, 1)]
#[case(Variant::Functional, 7)]
#[case(Variant::External, 0)]
#[case(Variant::External, 1)]
#[case(Variant::External, 7)]
#[tokio::test(start_paused = true)]
async fn fixes_count_every_sequential_update(#[case] variant: Variant, #[case] n: usize) {
    LocalSet::new()
        .run_until(async move {
            let counter = fresh(variant);

            for _ in 0..n {
                counter.schedule(DELAY).await.unwrap();
                if let Some(acc) = counter.accumulator() {
                    assert_eq!(acc, counter.count());
                }
            }

            assert_eq!(counter.count(), INITIAL_COUNT + n as i64);
        })
        .await;
}

#[rstest]
#[case(Variant::Functional)]
#[case(Variant::External)]
#[tokio::test(start_paused = true)]
async fn fixes_count_every_overlapping_update(#[case] variant: Variant) {
    LocalSet::new()
        .run_until(async move {
            let outcome = scenario::overlapping(variant, 5, DELAY).await;

            assert_eq!(outcome.mode, Mode::Overlapping);
            assert_eq!(outcome.displayed, 6);
            assert!(outcome.is_consistent());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn overlapping_external_updates_keep_accumulator_and_display_equal() {
    LocalSet::new()
        .run_until(async {
            let log = ActivityLog::new();
            let counter = counter::create(Variant::External, log.clone());

            let handles: Vec<_> = (0..6).map(|_| counter.schedule(DELAY)).collect();
            join_all(handles).await;

            // Every update read what the previous one wrote, and the display
            // took the same value as the accumulator each time.
            let applied: Vec<(i64, i64)> = log
                .recent(64)
                .into_iter()
                .filter_map(|entry| match entry.kind {
                    ActivityKind::Applied { read, wrote } => Some((read, wrote)),
                    _ => None,
                })
                .collect();
            let chained: Vec<(i64, i64)> = (0..6).map(|i| (i, i + 1)).collect();
            assert_eq!(applied, chained);
            assert_eq!(counter.state().version(), 6);
            assert_eq!(counter.accumulator(), Some(counter.count()));
        })
        .await;
}

#[rstest]
#[case(Variant::Stale)]
#[case(Variant::Functional)]
#[case(Variant::External)]
#[tokio::test(start_paused = true)]
async fn single_mount_update_reads_one_after_a_second(#[case] variant: Variant) {
    LocalSet::new()
        .run_until(async move {
            let Mounted { counter, effect } = counter::mount(variant, ActivityLog::new(), MOUNT_DELAY);
            assert_eq!(counter.count(), 0);

            effect.await.unwrap();

            assert_eq!(counter.count(), 1);
        })
        .await;
}

#[rstest]
#[case(Variant::Stale)]
#[case(Variant::Functional)]
#[case(Variant::External)]
#[tokio::test(start_paused = true)]
async fn update_after_unmount_is_flagged_not_applied(#[case] variant: Variant) {
    LocalSet::new()
        .run_until(async move {
            let log = ActivityLog::new();
            let Mounted { counter, effect } = counter::mount(variant, log.clone(), MOUNT_DELAY);

            counter.unmount();
            effect.await.unwrap();

            assert_eq!(counter.count(), INITIAL_COUNT);
            assert_eq!(log.count(variant, |k| *k == ActivityKind::Rejected), 1);
            assert_eq!(log.count(variant, |k| matches!(k, ActivityKind::Applied { .. })), 0);
            if variant == Variant::External {
                assert_eq!(counter.accumulator(), Some(INITIAL_COUNT + 1));
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn sequential_report_loses_nothing() {
    LocalSet::new()
        .run_until(async {
            for variant in Variant::ALL {
                let outcome = scenario::sequential(variant, 4, DELAY).await;
                assert_eq!(outcome.expected, 5);
                assert_eq!(outcome.displayed, 5, "{variant} lost updates");
            }
        })
        .await;
}
