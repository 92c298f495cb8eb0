use crate::notify::DAY_DATE_FORMAT;
use crate::schedule::WeekSchedule;
use serde::Serialize;

pub const DEFAULT_COUNTRY_CODE: &str = "972";
pub const DEFAULT_TEMPLATE: &str =
    "Hi {name}!\nJust a quick reminder about the pickup on {day}, {date}.\nThank you!";

/// Digits only, prefixed with `country_code` when it is missing. A single
/// leading trunk `0` is replaced by the code.
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.starts_with(country_code) {
        return digits;
    }
    match digits.strip_prefix('0') {
        Some(rest) => format!("{country_code}{rest}"),
        None => format!("{country_code}{digits}"),
    }
}

pub fn whatsapp_link(phone: &str, message: &str, country_code: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        normalize_phone(phone, country_code),
        urlencoding::encode(message)
    )
}

pub fn render_message(template: &str, name: &str, day: &str, date: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{day}", day)
        .replace("{date}", date)
}

#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub day: &'static str,
    pub date: String,
    pub person_name: String,
    pub phone: String,
    pub link: String,
}

/// One reminder per assigned slot whose snapshot carries a phone.
pub fn week_reminders(schedule: &WeekSchedule, template: &str, country_code: &str) -> Vec<Reminder> {
    schedule
        .assigned()
        .filter(|(_, a)| !a.person_phone.is_empty())
        .map(|(slot, a)| {
            let date = slot.date.format(DAY_DATE_FORMAT).to_string();
            let message = render_message(template, &a.person_name, slot.label, &date);
            Reminder {
                day: slot.label,
                link: whatsapp_link(&a.person_phone, &message, country_code),
                date,
                person_name: a.person_name.clone(),
                phone: normalize_phone(&a.person_phone, country_code),
            }
        })
        .collect()
}
