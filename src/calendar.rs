//! Arithmétique de dates pure (jour calendaire, sans fuseau).
//!
//! Toutes les recherches de jour de semaine sont inclusives : si `date` est
//! déjà le jour demandé, c'est elle qui est renvoyée. Les recherches de jour
//! de semaine saturent aux bornes de `NaiveDate` (`MIN` en arrière, `MAX` en
//! avant) ; les jours ouvrés renvoient la date d'entrée s'il n'y en a pas.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Recule de `weeks_back` semaines pleines, puis jusqu'au `weekday` le plus
/// récent (inclus).
pub fn previous_day_of_week(date: NaiveDate, weekday: Weekday, weeks_back: u32) -> NaiveDate {
    let anchor = date
        .checked_sub_days(Days::new(7 * u64::from(weeks_back)))
        .unwrap_or(NaiveDate::MIN);
    let back = days_between_weekdays(weekday, anchor.weekday());
    anchor.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN)
}

/// Prochain `weekday` à partir de `date` (inclus).
pub fn next_day_of_week(date: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = days_between_weekdays(date.weekday(), weekday);
    date.checked_add_days(Days::new(ahead)).unwrap_or(NaiveDate::MAX)
}

/// Jour ouvré précédent (strictement avant `date`, week-end sauté).
pub fn previous_business_day(date: NaiveDate) -> NaiveDate {
    let mut day = date;
    loop {
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => return date,
        }
        if is_business_day(day) {
            return day;
        }
    }
}

/// Jour ouvré suivant (strictement après `date`, week-end sauté).
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    let mut day = date;
    loop {
        match day.succ_opt() {
            Some(next) => day = next,
            None => return date,
        }
        if is_business_day(day) {
            return day;
        }
    }
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// nombre de jours pour aller de `from` à `to` en avançant (0..=6)
fn days_between_weekdays(from: Weekday, to: Weekday) -> u64 {
    let from = from.num_days_from_monday();
    let to = to.num_days_from_monday();
    u64::from((to + 7 - from) % 7)
}
