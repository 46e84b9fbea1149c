use crate::bookings::{Booking, YMD_FMT};
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;
use time::Date;
use tracing::warn;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A booking record as the remote endpoint serves it: both fields are plain
/// strings on the wire.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct RawBooking {
    date: String,
    time: String,
}

/// The remote system of record.  Queried exactly once, at startup; there is
/// no retry and no incremental merge.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct BookingSource {
    url: String,
}

impl BookingSource {
    pub(crate) fn new<S: Into<String>>(url: S) -> BookingSource {
        BookingSource { url: url.into() }
    }

    pub(crate) fn fetch(&self) -> anyhow::Result<Vec<Booking>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        let raw = client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .with_context(|| format!("failed to request bookings from {}", self.url))?
            .error_for_status()
            .context("booking source returned an error status")?
            .json::<Vec<RawBooking>>()
            .context("failed to decode booking payload")?;
        Ok(decode_bookings(raw))
    }
}

/// Records with an unparseable date are dropped with a warning rather than
/// failing the whole load.
pub(crate) fn decode_bookings(raw: Vec<RawBooking>) -> Vec<Booking> {
    raw.into_iter()
        .filter_map(|rb| match Date::parse(&rb.date, &YMD_FMT) {
            Ok(date) => Some(Booking::new(date, rb.time)),
            Err(e) => {
                warn!(date = %rb.date, error = %e, "skipping booking with invalid date");
                None
            }
        })
        .collect()
}
