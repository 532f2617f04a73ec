// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sales aggregates over the bookings table.
//!
//! A sale is dated by when the booking was made (`created_at`, local time),
//! not by the slot it reserves.

use chrono::NaiveDate;
use racedesk_core::types::{SalesDetail, SalesReport};
use racedesk_core::RacedeskError;
use rusqlite::params;

use crate::database::Database;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Revenue, count and average check for sales dated in `[start, end]`.
pub async fn sales_report(
    db: &Database,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<SalesReport, RacedeskError> {
    let start = start.format(DATE_FORMAT).to_string();
    let end = end.format(DATE_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COALESCE(SUM(amount), 0), COUNT(*), COALESCE(AVG(amount), 0)
                 FROM bookings WHERE substr(created_at, 1, 10) BETWEEN ?1 AND ?2",
                params![start, end],
                |row| {
                    Ok(SalesReport {
                        total_revenue: row.get(0)?,
                        total_bookings: row.get(1)?,
                        average_check: row.get(2)?,
                    })
                },
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Detail for one day: count, most booked start hour, 4-seat bookings, revenue per seat.
pub async fn day_detail(db: &Database, day: NaiveDate) -> Result<SalesDetail, RacedeskError> {
    let day_text = day.format(DATE_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            let (total_bookings, four_seat_bookings, revenue, seats): (i64, i64, f64, i64) = conn
                .query_row(
                    "SELECT COUNT(*),
                            COALESCE(SUM(CASE WHEN seats = 4 THEN 1 ELSE 0 END), 0),
                            COALESCE(SUM(amount), 0),
                            COALESCE(SUM(seats), 0)
                     FROM bookings WHERE substr(created_at, 1, 10) = ?1",
                    params![day_text],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )?;

            let popular_hour = match conn.query_row(
                "SELECT substr(booking_start, 12, 2) AS hour, COUNT(*) AS n
                 FROM bookings WHERE substr(created_at, 1, 10) = ?1
                 GROUP BY hour ORDER BY n DESC, hour ASC LIMIT 1",
                params![day_text],
                |row| row.get::<_, String>(0),
            ) {
                Ok(hour) => Some(format!("{hour}:00")),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e),
            };

            let avg_price_per_seat = if seats > 0 { revenue / seats as f64 } else { 0.0 };
            Ok(SalesDetail::Today {
                date: day,
                total_bookings,
                popular_hour,
                four_seat_bookings,
                avg_price_per_seat,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Rolling aggregate for the `days` days ending on `today` (inclusive).
pub async fn rolling_detail(
    db: &Database,
    today: NaiveDate,
    days: u32,
) -> Result<SalesDetail, RacedeskError> {
    let start = today - chrono::Duration::days(i64::from(days.saturating_sub(1)));
    let report = sales_report(db, start, today).await?;
    Ok(SalesDetail::Rolling {
        days,
        total_bookings: report.total_bookings,
        total_revenue: report.total_revenue,
        average_check: report.average_check,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::bookings::insert_booking;
    use chrono::NaiveDateTime;
    use racedesk_core::types::Booking;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn ts(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    async fn seed(db: &Database, id: &str, sold: NaiveDateTime, start_hour: u32, seats: u32, amount: f64) {
        let booking = Booking {
            booking_id: id.to_string(),
            client_id: "WA-1".to_string(),
            start: ts(20, start_hour),
            seats,
            hours: 1,
            amount,
        };
        insert_booking(db, &booking, sold).await.unwrap();
    }

    #[tokio::test]
    async fn report_covers_inclusive_range() {
        let (db, _dir) = setup_db().await;
        seed(&db, "a", ts(10, 12), 18, 2, 4000.0).await;
        seed(&db, "b", ts(11, 12), 18, 2, 6000.0).await;
        seed(&db, "c", ts(12, 12), 18, 2, 9999.0).await;

        let report = sales_report(
            &db,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(report.total_bookings, 2);
        assert_eq!(report.total_revenue, 10000.0);
        assert_eq!(report.average_check, 5000.0);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_range_is_all_zero() {
        let (db, _dir) = setup_db().await;
        let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = sales_report(&db, day, day).await.unwrap();
        assert_eq!(report, SalesReport::default());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn day_detail_finds_popular_hour_and_four_seat_bookings() {
        let (db, _dir) = setup_db().await;
        seed(&db, "a", ts(14, 10), 19, 4, 8000.0).await;
        seed(&db, "b", ts(14, 11), 19, 2, 4000.0).await;
        seed(&db, "c", ts(14, 12), 23, 4, 10000.0).await;
        seed(&db, "d", ts(13, 12), 15, 1, 2000.0).await;

        let detail = day_detail(&db, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
            .await
            .unwrap();
        match detail {
            SalesDetail::Today {
                total_bookings,
                popular_hour,
                four_seat_bookings,
                avg_price_per_seat,
                ..
            } => {
                assert_eq!(total_bookings, 3);
                assert_eq!(popular_hour.as_deref(), Some("19:00"));
                assert_eq!(four_seat_bookings, 2);
                assert_eq!(avg_price_per_seat, 22000.0 / 10.0);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn day_without_sales_has_no_popular_hour() {
        let (db, _dir) = setup_db().await;
        let detail = day_detail(&db, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
            .await
            .unwrap();
        assert!(matches!(
            detail,
            SalesDetail::Today { total_bookings: 0, popular_hour: None, .. }
        ));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn rolling_window_counts_back_from_today() {
        let (db, _dir) = setup_db().await;
        seed(&db, "in", ts(1, 12), 18, 2, 4000.0).await;
        seed(&db, "edge", ts(2, 9), 18, 1, 2000.0).await;
        seed(&db, "out", ts(3, 9), 18, 1, 2000.0).await;

        // Window of 2 days ending March 2 covers March 1 and 2.
        let detail = rolling_detail(&db, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), 2)
            .await
            .unwrap();
        assert_eq!(
            detail,
            SalesDetail::Rolling {
                days: 2,
                total_bookings: 2,
                total_revenue: 6000.0,
                average_check: 3000.0,
            }
        );
        db.close().await.unwrap();
    }
}
