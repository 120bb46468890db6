// crates/slotbook_booking/src/slots_proptest.rs
#[cfg(test)]
mod props {
    use crate::slots::{generate_slots, window_end, SlotGrid};
    use chrono::{Duration, TimeZone, Timelike, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;
    use slotbook_common::services::BusyPeriod;

    proptest! {
        /// Whatever the grid and busy set, the generator only ever emits
        /// strictly-future, on-grid, non-busy slots in ascending order.
        #[test]
        fn generated_slots_respect_grid_busy_and_order(
            interval in prop::sample::select(vec![10u32, 15, 20, 30, 60]),
            start_hour in 6u32..12,
            span in 1u32..8,
            busy_plan in prop::collection::vec((0i64..14, 0u32..24, 1i64..180), 0..6),
        ) {
            let tz: Tz = "UTC".parse().unwrap();
            let now = Utc.with_ymd_and_hms(2025, 5, 5, 7, 45, 0).unwrap();
            let start = now.with_timezone(&tz);
            let end = window_end(start, 14);

            let grid = SlotGrid {
                start_hour,
                end_hour: start_hour + span,
                interval_minutes: interval,
            };
            let busy: Vec<BusyPeriod> = busy_plan
                .iter()
                .map(|&(day, hour, minutes)| {
                    let begin = now + Duration::days(day) + Duration::hours(i64::from(hour));
                    BusyPeriod::new(begin, begin + Duration::minutes(minutes))
                })
                .collect();

            let slots = generate_slots(start, end, &grid, &busy, now).unwrap();

            for pair in slots.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for slot in &slots {
                let utc = slot.with_timezone(&Utc);
                prop_assert!(utc > now);
                prop_assert!(slot.date_naive() <= end.date_naive());
                prop_assert!((grid.start_hour..grid.end_hour).contains(&slot.hour()));
                prop_assert_eq!(slot.minute() % interval.max(1), 0);
                prop_assert_eq!(slot.second(), 0);
                prop_assert!(!busy.iter().any(|p| p.contains(utc)));
            }
        }

        /// Grid positions that are free and future on any window date are
        /// never silently dropped (in a zone without DST transitions).
        #[test]
        fn free_future_grid_positions_are_all_offered(
            busy_plan in prop::collection::vec((0i64..14, 9u32..17), 0..4),
        ) {
            let tz: Tz = "UTC".parse().unwrap();
            let now = Utc.with_ymd_and_hms(2025, 5, 5, 7, 45, 0).unwrap();
            let start = now.with_timezone(&tz);
            let end = window_end(start, 14);
            let grid = SlotGrid { start_hour: 9, end_hour: 17, interval_minutes: 30 };

            let busy: Vec<BusyPeriod> = busy_plan
                .iter()
                .map(|&(day, hour)| {
                    let begin = now + Duration::days(day) + Duration::hours(i64::from(hour));
                    BusyPeriod::new(begin, begin + Duration::hours(1))
                })
                .collect();

            let slots = generate_slots(start, end, &grid, &busy, now).unwrap();

            // Walk every grid position on the window's dates and check
            // membership matches the filter rules exactly.
            let mut day = start.date_naive();
            while day <= end.date_naive() {
                for hour in 9..17u32 {
                    for minute in [0u32, 30] {
                        let candidate = tz
                            .from_local_datetime(&day.and_hms_opt(hour, minute, 0).unwrap())
                            .unwrap();
                        let utc = candidate.with_timezone(&Utc);
                        let expected = utc > now
                            && !busy.iter().any(|p| p.contains(utc));
                        prop_assert_eq!(slots.contains(&candidate), expected);
                    }
                }
                day = day.succ_opt().unwrap();
            }
        }
    }
}
