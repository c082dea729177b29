use std::fmt::Display;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};

use super::{AddCommand, Command, ConfigAction, KindArg};
use crate::{
    dashboard::{load_dashboard, render_dashboard, StaticInsights},
    db::{
        models::{Activity, Appointment, Contact, Medication, ACTIVITY_TYPES},
        Database,
    },
    forms::{ActivityField, AppointmentField, ContactField, Draft, FieldContext, MedicationField},
    identity::{LayeredOwner, OwnerId, OwnerProvider},
    records::{Record, RecordFilter, RecordStore},
    screen::{render::render_view, RecordsScreen},
    AppState,
};

/// One `--flag value` applied to a draft field.
struct FieldEdit<F> {
    flag: &'static str,
    field: F,
    value: String,
}

impl<F> FieldEdit<F> {
    fn new(flag: &'static str, field: F, value: impl Into<String>) -> Self {
        Self {
            flag,
            field,
            value: value.into(),
        }
    }
}

/// Flag first, then environment, then the saved setting.
pub fn resolve_owner(state: &AppState, flag: Option<String>) -> Result<OwnerId> {
    let provider = LayeredOwner::new()
        .with(flag)
        .with_env()
        .with(state.settings.owner_id());
    Ok(provider.require_owner()?)
}

/// Runs one subcommand and returns what should be printed. Typed times are
/// read in `now`'s zone and `confirm` answers the delete prompt.
pub async fn execute<Tz>(
    state: &AppState,
    owner_flag: Option<String>,
    command: Command,
    now: &DateTime<Tz>,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match command {
        Command::Config { action } => configure(state, action),
        Command::List {
            kind,
            search,
            window,
        } => {
            let owner = resolve_owner(state, owner_flag)?;
            let window = window.unwrap_or(state.settings.get().default_window);
            let filter = RecordFilter::new(search, window);
            match kind {
                KindArg::Activity => list_records::<Activity, _>(state, owner, filter, now).await,
                KindArg::Medication => {
                    list_records::<Medication, _>(state, owner, filter, now).await
                }
                KindArg::Appointment => {
                    list_records::<Appointment, _>(state, owner, filter, now).await
                }
                KindArg::Contact => list_records::<Contact, _>(state, owner, filter, now).await,
            }
        }
        Command::Add { record } => {
            let owner = resolve_owner(state, owner_flag)?;
            add(state, owner, record, now).await
        }
        Command::Delete { kind, id, yes } => {
            let owner = resolve_owner(state, owner_flag)?;
            let confirm = |prompt: &str| if yes { Ok(true) } else { confirm(prompt) };
            match kind {
                KindArg::Activity => {
                    delete_record::<Activity, _>(state, owner, &id, now, confirm).await
                }
                KindArg::Medication => {
                    delete_record::<Medication, _>(state, owner, &id, now, confirm).await
                }
                KindArg::Appointment => {
                    delete_record::<Appointment, _>(state, owner, &id, now, confirm).await
                }
                KindArg::Contact => {
                    delete_record::<Contact, _>(state, owner, &id, now, confirm).await
                }
            }
        }
        Command::Dashboard => {
            let owner = resolve_owner(state, owner_flag)?;
            let summary =
                load_dashboard(&state.db, &owner, now.with_timezone(&Utc), &StaticInsights).await;
            Ok(render_dashboard(&summary))
        }
    }
}

fn screen_for<'a, R, Tz>(
    state: &'a AppState,
    owner: OwnerId,
    ctx: &FieldContext<Tz>,
) -> RecordsScreen<R, &'a Database>
where
    Tz: TimeZone,
    R: Record,
    R::Input: Draft,
    Database: RecordStore<R>,
{
    RecordsScreen::new(&state.db, owner, ctx)
        .with_refetch_after_write(state.settings.get().refetch_after_write)
}

async fn list_records<R, Tz>(
    state: &AppState,
    owner: OwnerId,
    filter: RecordFilter,
    now: &DateTime<Tz>,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
    R: Record,
    R::Input: Draft,
    Database: RecordStore<R>,
{
    let ctx = FieldContext::new(now);
    let mut screen = screen_for::<R, _>(state, owner, &ctx).with_filter(filter);
    screen.load().await?;
    Ok(render_view(&screen.view(now), now))
}

async fn add<Tz: TimeZone>(
    state: &AppState,
    owner: OwnerId,
    record: AddCommand,
    now: &DateTime<Tz>,
) -> Result<String> {
    match record {
        AddCommand::Activity {
            activity_type,
            description,
            at,
        } => {
            // Accept "walking" for "Walking".
            let activity_type = ACTIVITY_TYPES
                .iter()
                .find(|choice| choice.eq_ignore_ascii_case(activity_type.trim()))
                .map(|choice| choice.to_string())
                .unwrap_or(activity_type);
            let mut edits = vec![
                FieldEdit::new("type", ActivityField::Type, activity_type),
                FieldEdit::new("description", ActivityField::Description, description),
            ];
            edits.extend(at.map(|at| FieldEdit::new("at", ActivityField::CompletedAt, at)));
            add_record::<Activity, _>(state, owner, edits, now).await
        }
        AddCommand::Medication {
            name,
            dosage,
            start,
            end,
        } => {
            let mut edits = vec![
                FieldEdit::new("name", MedicationField::Name, name),
                FieldEdit::new("dosage", MedicationField::Dosage, dosage),
            ];
            edits.extend(start.map(|s| FieldEdit::new("start", MedicationField::StartDate, s)));
            edits.extend(end.map(|e| FieldEdit::new("end", MedicationField::EndDate, e)));
            add_record::<Medication, _>(state, owner, edits, now).await
        }
        AddCommand::Appointment {
            title,
            at,
            location,
            notes,
        } => {
            let mut edits = vec![
                FieldEdit::new("title", AppointmentField::Title, title),
                FieldEdit::new("at", AppointmentField::ScheduledAt, at),
            ];
            edits.extend(
                location.map(|l| FieldEdit::new("location", AppointmentField::Location, l)),
            );
            edits.extend(notes.map(|n| FieldEdit::new("notes", AppointmentField::Notes, n)));
            add_record::<Appointment, _>(state, owner, edits, now).await
        }
        AddCommand::Contact {
            name,
            relationship,
            phone,
        } => {
            let edits = vec![
                FieldEdit::new("name", ContactField::Name, name),
                FieldEdit::new("relationship", ContactField::Relationship, relationship),
                FieldEdit::new("phone", ContactField::Phone, phone),
            ];
            add_record::<Contact, _>(state, owner, edits, now).await
        }
    }
}

async fn add_record<R, Tz>(
    state: &AppState,
    owner: OwnerId,
    edits: Vec<FieldEdit<<R::Input as Draft>::Field>>,
    now: &DateTime<Tz>,
) -> Result<String>
where
    Tz: TimeZone,
    R: Record,
    R::Input: Draft,
    Database: RecordStore<R>,
{
    let ctx = FieldContext::new(now);
    let mut screen = screen_for::<R, _>(state, owner, &ctx);
    screen.open_form();
    for edit in edits {
        screen
            .edit(edit.field, &edit.value, &ctx)
            .with_context(|| format!("invalid --{}", edit.flag))?;
    }
    let record = screen.submit(&ctx).await?;
    Ok(format!("Added {} {}\n", R::KIND.singular(), record.id()))
}

async fn delete_record<R, Tz>(
    state: &AppState,
    owner: OwnerId,
    id: &str,
    now: &DateTime<Tz>,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<String>
where
    Tz: TimeZone,
    R: Record,
    R::Input: Draft,
    Database: RecordStore<R>,
{
    let ctx = FieldContext::new(now);
    let mut screen = screen_for::<R, _>(state, owner, &ctx);
    screen.load().await?;

    let prompt = match screen.list().get(id) {
        Some(record) if record.description().is_empty() => {
            format!("Delete {} \"{}\"?", R::KIND.singular(), record.category())
        }
        Some(record) => format!(
            "Delete {} \"{}: {}\"?",
            R::KIND.singular(),
            record.category(),
            record.description()
        ),
        None => return Ok(format!("No {} with id {id}\n", R::KIND.singular())),
    };

    screen.request_delete(id);
    if !confirm(&prompt)? {
        screen.decline_delete();
        return Ok(format!("Kept {} {id}\n", R::KIND.singular()));
    }
    screen.confirm_delete().await?;
    Ok(format!("Deleted {} {id}\n", R::KIND.singular()))
}

fn configure(state: &AppState, action: ConfigAction) -> Result<String> {
    match action {
        ConfigAction::Show => {
            let settings = serde_json::to_string_pretty(&state.settings.get())?;
            Ok(format!("{}\n{settings}\n", state.settings.path().display()))
        }
        ConfigAction::SetOwner { owner } => {
            let Some(owner) = OwnerId::new(owner) else {
                bail!("owner id cannot be blank");
            };
            state.settings.set_owner(Some(owner.to_string()))?;
            Ok(format!("Owner set to {owner}\n"))
        }
        ConfigAction::ClearOwner => {
            state.settings.set_owner(None)?;
            Ok("Owner cleared\n".to_string())
        }
        ConfigAction::SetWindow { window } => {
            state.settings.set_default_window(window)?;
            Ok(format!("Default window set to {window}\n"))
        }
        ConfigAction::SetRefetch { enabled } => {
            state.settings.set_refetch_after_write(enabled)?;
            Ok(format!("Refetch after write: {enabled}\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{records::TimeWindow, settings::SettingsStore, testing::Eastern2024};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> AppState {
        AppState {
            db: Database::new(dir.path().join("carelog.sqlite3")).unwrap(),
            settings: SettingsStore::in_dir(dir.path()).unwrap(),
        }
    }

    use chrono::FixedOffset;

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-10T20:00:00+00:00").unwrap()
    }

    fn owner() -> Option<String> {
        Some("U1".into())
    }

    async fn run(state: &AppState, command: Command) -> Result<String> {
        execute(state, owner(), command, &now(), |_| Ok(true)).await
    }

    fn list(kind: KindArg, window: TimeWindow) -> Command {
        Command::List {
            kind,
            search: String::new(),
            window: Some(window),
        }
    }

    #[tokio::test]
    async fn add_then_list_activity() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let added = run(
            &state,
            Command::Add {
                record: AddCommand::Activity {
                    activity_type: "walking".into(),
                    description: "Park loop".into(),
                    at: Some("2024-03-10T09:30".into()),
                },
            },
        )
        .await
        .unwrap();
        assert!(added.starts_with("Added activity "));

        let listed = run(&state, list(KindArg::Activity, TimeWindow::Today)).await.unwrap();
        let id = added.trim().trim_start_matches("Added activity ");
        assert_eq!(listed, format!("Today\n   9:30 AM  Walking: Park loop  [{id}]\n"));
    }

    #[tokio::test]
    async fn rejected_field_names_the_flag() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let err = run(
            &state,
            Command::Add {
                record: AddCommand::Appointment {
                    title: "Dentist".into(),
                    at: "2024-03-01T10:00".into(),
                    location: None,
                    notes: None,
                },
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "invalid --at: appointment_date must be between 2024-03-10 and 2029-03-10, \
             got 2024-03-01"
        );
    }

    #[tokio::test]
    async fn unreadable_time_is_reported_as_such() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let err = run(
            &state,
            Command::Add {
                record: AddCommand::Activity {
                    activity_type: "Meal".into(),
                    description: "Lunch".into(),
                    at: Some("tomorrow".into()),
                },
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "invalid --at: completed_at could not be read as a date: 'tomorrow'"
        );
    }

    #[tokio::test]
    async fn typed_times_follow_the_zone_rules_of_their_date() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        // Midsummer, but the activity happened under winter time.
        let now = DateTime::parse_from_rfc3339("2024-07-01T16:00:00Z")
            .unwrap()
            .with_timezone(&Eastern2024);
        let add = Command::Add {
            record: AddCommand::Activity {
                activity_type: "Meal".into(),
                description: "Night snack".into(),
                at: Some("2024-01-14T23:30".into()),
            },
        };
        let added = execute(&state, owner(), add, &now, |_| Ok(true)).await.unwrap();
        let id = added.trim().trim_start_matches("Added activity ");

        let stored = RecordStore::<Activity>::list(&state.db, &OwnerId::new("U1").unwrap())
            .await
            .unwrap();
        assert_eq!(stored[0].completed_at.to_rfc3339(), "2024-01-15T04:30:00+00:00");

        let all = list(KindArg::Activity, TimeWindow::All);
        let listed = execute(&state, owner(), all, &now, |_| Ok(true)).await.unwrap();
        assert_eq!(
            listed,
            format!("Sunday, January 14, 2024\n  11:30 PM  Meal: Night snack  [{id}]\n")
        );
    }

    #[tokio::test]
    async fn validation_errors_surface_before_the_store() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let err = run(
            &state,
            Command::Add {
                record: AddCommand::Contact {
                    name: "Ana".into(),
                    relationship: "Daughter".into(),
                    phone: "555".into(),
                },
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("not a valid phone number"));
        let listed = run(&state, list(KindArg::Contact, TimeWindow::All)).await.unwrap();
        assert!(listed.starts_with("No contacts logged yet."));
    }

    #[tokio::test]
    async fn delete_asks_first_and_can_be_declined() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let added = run(
            &state,
            Command::Add {
                record: AddCommand::Medication {
                    name: "Aspirin".into(),
                    dosage: "81mg".into(),
                    start: None,
                    end: None,
                },
            },
        )
        .await
        .unwrap();
        let id = added.trim().trim_start_matches("Added medication ").to_string();

        let mut asked = String::new();
        let kept = execute(
            &state,
            owner(),
            Command::Delete {
                kind: KindArg::Medication,
                id: id.clone(),
                yes: false,
            },
            &now(),
            |prompt| {
                asked = prompt.to_string();
                Ok(false)
            },
        )
        .await
        .unwrap();
        assert_eq!(asked, "Delete medication \"Aspirin: 81mg\"?");
        assert_eq!(kept, format!("Kept medication {id}\n"));

        let deleted = run(
            &state,
            Command::Delete {
                kind: KindArg::Medication,
                id: id.clone(),
                yes: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(deleted, format!("Deleted medication {id}\n"));

        let again = run(
            &state,
            Command::Delete {
                kind: KindArg::Medication,
                id: id.clone(),
                yes: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(again, format!("No medication with id {id}\n"));
    }

    #[tokio::test]
    async fn other_owners_records_are_invisible() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        run(
            &state,
            Command::Add {
                record: AddCommand::Contact {
                    name: "Ana".into(),
                    relationship: "Daughter".into(),
                    phone: "5551234567".into(),
                },
            },
        )
        .await
        .unwrap();

        let theirs = execute(
            &state,
            Some("U2".into()),
            list(KindArg::Contact, TimeWindow::All),
            &now(),
            |_| Ok(true),
        )
        .await
        .unwrap();
        assert!(theirs.starts_with("No contacts logged yet."));
    }

    #[tokio::test]
    async fn saved_owner_is_used_without_a_flag() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        run(
            &state,
            Command::Config {
                action: ConfigAction::SetOwner {
                    owner: " U7 ".into(),
                },
            },
        )
        .await
        .unwrap();
        assert_eq!(state.settings.owner_id().as_deref(), Some("U7"));
        // CARELOG_OWNER may be set in the test environment; only check the
        // saved value is a valid fallback.
        let owner = LayeredOwner::new()
            .with(None)
            .with(state.settings.owner_id())
            .require_owner()
            .unwrap();
        assert_eq!(owner.as_str(), "U7");
    }

    #[tokio::test]
    async fn dashboard_renders_for_a_new_owner() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        let text = run(&state, Command::Dashboard).await.unwrap();
        assert!(text.starts_with("Health insights\n"));
        assert!(text.contains("No upcoming appointments."));
    }
}
