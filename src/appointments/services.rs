use time::{macros::format_description, Date, OffsetDateTime, Time, UtcOffset};

/// Why a requested slot instant was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SlotRejection {
    #[error("Invalid data. Check that every field is correct.")]
    Malformed,
    #[error("The appointment date and time must be in the future.")]
    Past,
    #[error("Appointments cannot be created for today.")]
    SameDay,
}

/// Combines a `YYYY-MM-DD` date and `HH:MM` time read in the reference offset.
pub fn parse_slot(
    date: &str,
    time: &str,
    offset: UtcOffset,
) -> Result<OffsetDateTime, SlotRejection> {
    let date = Date::parse(date.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| SlotRejection::Malformed)?;
    let time = Time::parse(time.trim(), format_description!("[hour]:[minute]"))
        .map_err(|_| SlotRejection::Malformed)?;
    Ok(date.with_time(time).assume_offset(offset))
}

/// Slots may only be created from tomorrow on.
pub fn check_slot(
    at: OffsetDateTime,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Result<(), SlotRejection> {
    if at < now {
        return Err(SlotRejection::Past);
    }
    if at.to_offset(offset).date() == now.to_offset(offset).date() {
        return Err(SlotRejection::SameDay);
    }
    Ok(())
}

/// Midnight at the start of tomorrow in the reference offset.
pub fn start_of_tomorrow(now: OffsetDateTime, offset: UtcOffset) -> OffsetDateTime {
    let today = now.to_offset(offset).date();
    let tomorrow = today.next_day().unwrap_or(today);
    tomorrow.midnight().assume_offset(offset)
}
