// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompts and the fixed user-facing fallback replies.

use chrono::NaiveDate;
use racedesk_core::Role;
use racedesk_core::types::{BusinessSettings, ClientProfile};

/// Quick path failed on both backends.
pub const OVERLOAD_REPLY: &str =
    "Sorry, we're a bit overloaded right now. Please try again in a minute.";

/// The primary failed in the middle of a tool loop.
pub const TECHNICAL_REPLY: &str = "Something went wrong on our side. Let's start simple: when do you want to come and how many seats?";

/// Empty final turn or an exhausted tool budget.
pub const CONTINUATION_REPLY: &str =
    "Let's continue. What time, how many seats and how many hours are you planning?";

/// Renders the system prompt for `role`.
///
/// The client prompt also carries the profile, including its short history
/// excerpt, so the model does not ask again for details already given.
pub fn system_prompt(
    role: Role,
    settings: &BusinessSettings,
    today: NaiveDate,
    profile: Option<&ClientProfile>,
) -> String {
    match role {
        Role::Client => client_prompt(settings, today, profile),
        Role::Admin => admin_prompt(settings, today),
    }
}

fn client_prompt(
    settings: &BusinessSettings,
    today: NaiveDate,
    profile: Option<&ClientProfile>,
) -> String {
    let mut prompt = format!(
        "You are the sales manager of {name}, a racing simulator club.\n\
         Today is {today}.\n\
         \n\
         Rules:\n\
         1. Never ask again for the number of seats, the time or the number of hours \
         if the conversation already contains it.\n\
         2. Answer in the language of the client's last message.\n\
         3. Follow the script: seats, then time, then hours, then booking. Do not go back.\n\
         4. Be confident and direct. Ignore rudeness and steer back to the booking.\n\
         5. Use CheckAvailability before CreateBooking, GetPrice for quotes and \
         GeneratePaymentLink once a booking exists. Dates are YYYY-MM-DD, times HH:MM.\n\
         \n\
         Venue:\n\
         - Address: {address}\n\
         - Opening hours: {hours}\n",
        name = settings.name,
        address = settings.address,
        hours = settings.working_hours,
        today = today.format("%Y-%m-%d"),
    );

    if let Some(profile) = profile {
        prompt.push_str(&format!(
            "\nClient: {} (language {}, loyalty {})\n",
            profile.name, profile.language, profile.loyalty_level
        ));
        if !profile.history.is_empty() && profile.history != "[]" {
            prompt.push_str(&format!("Recent messages: {}\n", profile.history));
        }
    }
    prompt
}

fn admin_prompt(settings: &BusinessSettings, today: NaiveDate) -> String {
    format!(
        "You are the business analytics assistant for {name} ({address}, open {hours}).\n\
         Today is {today}.\n\
         \n\
         Give the owner accurate, data-driven answers. Use the sales, revenue, marketing \
         and weather tools instead of guessing figures. When asked about promotions, \
         discounts or how to improve sales, call GetSalesRecommendationTool.\n\
         \n\
         Be concise and professional.\n",
        name = settings.name,
        address = settings.address,
        hours = settings.working_hours,
        today = today.format("%Y-%m-%d"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BusinessSettings {
        BusinessSettings {
            name: "Team Racing Club".into(),
            address: "Abylai Khan Ave 27/4".into(),
            working_hours: "12:00–04:00".into(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn client_prompt_carries_business_details() {
        let prompt = system_prompt(Role::Client, &settings(), today(), None);
        assert!(prompt.contains("Team Racing Club"));
        assert!(prompt.contains("Abylai Khan Ave 27/4"));
        assert!(prompt.contains("12:00–04:00"));
        assert!(prompt.contains("2026-03-14"));
        assert!(prompt.contains("sales manager"));
    }

    #[test]
    fn admin_prompt_differs_from_client_prompt() {
        let admin = system_prompt(Role::Admin, &settings(), today(), None);
        assert!(admin.contains("analytics"));
        assert!(admin.contains("GetSalesRecommendationTool"));
        assert_ne!(admin, system_prompt(Role::Client, &settings(), today(), None));
    }

    #[test]
    fn profile_history_is_appended_when_present() {
        let profile = ClientProfile {
            client_id: "TG-1".into(),
            name: "Client".into(),
            language: "ru".into(),
            loyalty_level: "Standard".into(),
            total_spent: 0.0,
            history: r#"[{"time":"18:00","sender":"client","text":"2 seats"}]"#.into(),
        };
        let prompt = system_prompt(Role::Client, &settings(), today(), Some(&profile));
        assert!(prompt.contains("loyalty Standard"));
        assert!(prompt.contains("2 seats"));

        let empty = ClientProfile {
            history: "[]".into(),
            ..profile
        };
        let prompt = system_prompt(Role::Client, &settings(), today(), Some(&empty));
        assert!(!prompt.contains("Recent messages"));
    }
}
