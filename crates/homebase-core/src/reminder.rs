use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{require, HomebaseError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub reminder_time: DateTime<Utc>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Reminder {
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.reminder_time < now
    }

    pub fn patched(&self, update: &UpdateReminder, now: DateTime<Utc>) -> Reminder {
        let mut next = self.clone();
        if let Some(ref title) = update.title {
            next.title = title.clone();
        }
        if let Some(reminder_time) = update.reminder_time {
            next.reminder_time = reminder_time;
        }
        next.updated_at = Some(now);
        next
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReminder {
    pub title: String,
    pub reminder_time: DateTime<Utc>,
}

impl CreateReminder {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        require("title", &self.title)
    }

    pub fn into_reminder(self, id: String, user_id: String, now: DateTime<Utc>) -> Reminder {
        Reminder {
            id,
            title: self.title,
            reminder_time: self.reminder_time,
            user_id,
            created_at: now,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReminder {
    pub title: Option<String>,
    pub reminder_time: Option<DateTime<Utc>>,
}

impl UpdateReminder {
    pub fn validate(&self) -> Result<(), HomebaseError> {
        match self.title {
            Some(ref title) => require("title", title),
            None => Ok(()),
        }
    }
}

/// The reminders owned by `user_id`, soonest first.
pub fn reminders_for(reminders: &[Reminder], user_id: &str) -> Vec<Reminder> {
    let mut out: Vec<Reminder> = reminders
        .iter()
        .filter(|r| r.user_id == user_id)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.reminder_time.cmp(&b.reminder_time));
    out
}

/// A user's reminders split around a point in time.
#[derive(Debug, Clone, Default)]
pub struct ReminderAgenda {
    pub upcoming: Vec<Reminder>,
    pub past: Vec<Reminder>,
}

impl ReminderAgenda {
    pub fn build(reminders: &[Reminder], user_id: &str, now: DateTime<Utc>) -> Self {
        let (past, upcoming) = reminders_for(reminders, user_id)
            .into_iter()
            .partition(|r| r.is_past(now));
        ReminderAgenda { upcoming, past }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn reminder(id: &str, user_id: &str, offset_mins: i64, now: DateTime<Utc>) -> Reminder {
        CreateReminder {
            title: format!("Reminder {id}"),
            reminder_time: now + Duration::minutes(offset_mins),
        }
        .into_reminder(id.into(), user_id.into(), now)
    }

    #[test]
    fn reminders_for_filters_owner_and_sorts_ascending() {
        let now = Utc::now();
        let all = vec![
            reminder("late", "u1", 60, now),
            reminder("theirs", "u2", 1, now),
            reminder("early", "u1", -30, now),
        ];
        let mine = reminders_for(&all, "u1");
        let ids: Vec<&str> = mine.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["early", "late"]);
    }

    #[test]
    fn agenda_splits_past_and_upcoming() {
        let now = Utc::now();
        let all = vec![
            reminder("soon", "u1", 5, now),
            reminder("gone", "u1", -5, now),
            reminder("exact", "u1", 0, now),
        ];
        let agenda = ReminderAgenda::build(&all, "u1", now);
        let upcoming: Vec<&str> = agenda.upcoming.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(upcoming, ["exact", "soon"]);
        assert_eq!(agenda.past.len(), 1);
        assert_eq!(agenda.past[0].id, "gone");
    }

    #[test]
    fn patched_keeps_owner_and_stamps_updated_at() {
        let now = Utc::now();
        let r = reminder("1", "u1", 10, now);
        let later = now + Duration::seconds(1);
        let next = r.patched(
            &UpdateReminder {
                title: Some("Dentist".into()),
                reminder_time: None,
            },
            later,
        );
        assert_eq!(next.title, "Dentist");
        assert_eq!(next.reminder_time, r.reminder_time);
        assert_eq!(next.user_id, "u1");
        assert_eq!(next.updated_at, Some(later));
    }

    #[test]
    fn reminder_time_is_camel_case_on_the_wire() {
        let now = Utc::now();
        let json = serde_json::to_value(reminder("1", "u1", 0, now)).unwrap();
        assert!(json.get("reminderTime").is_some());
        assert_eq!(json["userId"], "u1");
    }
}
