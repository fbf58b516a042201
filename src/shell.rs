//! Line-oriented terminal front-end.

use autoriza_client::{
    lifecycle::{actions_for, Lifecycle},
    Attachment, Error,
};
use autoriza_shared::{
    account::{
        handle::{
            CodeFlow, RegisterDescriptor, SetPasswordDescriptor, UserDescriptor,
            VerifyCodeDescriptor,
        },
        Role,
    },
    authorization::handle::{PresenceUpdate, SelfRegisterDescriptor, SubmissionDescriptor},
    campus::CampusDescriptor,
    event::{default_selected_date, handle::EventDescriptor, today_utc, Event},
};
use chrono::NaiveDate;
use std::{fmt::Write, path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    route::{self, Resolution, Route},
    session::Session,
};

pub const HELP: &str = "\
commands, fields after the first are separated by ';':
  go <path>                         navigate, e.g. go /dashboard
  login <email> <password> | logout | whoami
  register <name>; <email>; <password>
  request-code <email> [; <name>]   without a name, requests a password reset code
  verify-code <email>; <code>
  set-password <email>; <code>; <password>; <confirmation>
  public [campus id] | public-event <link>
  preregistered <link>
  self-register <link>; <student>; <registration>; <student email>; <guardian>; <guardian email>; <file>
  submit <link>; <authorization id>; <student email>; <guardian>; <guardian email>; <file>
  events | event <id> | template <id>
  create-event <title>; <start>[; <end>[; <time>[; <location>]]]
  edit-event <id>; <title>; <start>[; <end>[; <time>[; <location>]]]
  delete-event <id>
  authorizations <event id>
  preregister <event id>; <student>[; <registration>]
  approve <event id>; <id> | reject <event id>; <id>; <reason>
  download <event id>; <id>
  dates <event id>
  presence <event id> <id> <date> ida|volta on|off
  campuses | create-campus <name> | update-campus <id>; <name> | delete-campus <id>
  users | delete-user <id>
  create-user <name>; <email>; professor|admin; <password>
  update-user <id>; <name>; <email>; professor|admin; active|inactive[; <password>]
  quit";

/// What the shell does after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

#[derive(Debug)]
enum Command {
    Help,
    Quit,
    Go(String),
    WhoAmI,
    Login { email: String, password: String },
    Logout,
    Register(RegisterDescriptor),
    RequestCode { email: String, flow: CodeFlow },
    VerifyCode(VerifyCodeDescriptor),
    SetPassword(SetPasswordDescriptor),
    PublicEvents(Option<u64>),
    PublicEvent(String),
    Preregistered(String),
    SelfRegister {
        link: String,
        descriptor: SelfRegisterDescriptor,
        file: Option<PathBuf>,
    },
    Submit {
        link: String,
        id: u64,
        descriptor: SubmissionDescriptor,
        file: Option<PathBuf>,
    },
    Events,
    Event(u64),
    Template(u64),
    CreateEvent(EventDescriptor),
    EditEvent(u64, EventDescriptor),
    DeleteEvent(u64),
    Authorizations(u64),
    Preregister {
        event_id: u64,
        name: String,
        registration: Option<String>,
    },
    Approve {
        event_id: u64,
        id: u64,
    },
    Reject {
        event_id: u64,
        id: u64,
        reason: String,
    },
    Dates(u64),
    Presence {
        event_id: u64,
        id: u64,
        date: NaiveDate,
        update: PresenceUpdate,
    },
    Download {
        event_id: u64,
        id: u64,
    },
    Campuses,
    CreateCampus(String),
    UpdateCampus(u64, String),
    DeleteCampus(u64),
    Users,
    CreateUser(UserDescriptor),
    UpdateUser(u64, UserDescriptor),
    DeleteUser(u64),
}

fn id(s: &str) -> Result<u64, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("\"{s}\" is not a valid id"))
}

fn date(s: &str) -> Result<NaiveDate, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("\"{s}\" is not a date, expected YYYY-MM-DD"))
}

fn optional(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn file(s: Option<&str>) -> Option<PathBuf> {
    optional(s).map(PathBuf::from)
}

fn role(s: &str) -> Result<Role, String> {
    s.trim().parse()
}

/// `<title>; <start>[; <end>[; <time>[; <location>]]]`
fn event_descriptor(fields: &[&str]) -> Result<EventDescriptor, String> {
    let field = |i: usize| fields.get(i).copied();
    Ok(EventDescriptor {
        title: field(0).unwrap_or_default().to_owned(),
        description: None,
        start_date: date(field(1).unwrap_or_default())?,
        end_date: optional(field(2)).map(|end| date(&end)).transpose()?,
        time: optional(field(3)),
        location: optional(field(4)),
        campus_id: None,
    })
}

impl Command {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let rest = rest.trim();
        let fields: Vec<&str> = rest.split(';').map(str::trim).collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_owned();
        let words: Vec<&str> = rest.split_whitespace().collect();

        Ok(match verb {
            "help" | "" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "go" => Command::Go(rest.to_owned()),
            "whoami" => Command::WhoAmI,
            "login" => match words.as_slice() {
                [email, password] => Command::Login {
                    email: (*email).to_owned(),
                    password: (*password).to_owned(),
                },
                _ => return Err("usage: login <email> <password>".to_owned()),
            },
            "logout" => Command::Logout,
            "register" => Command::Register(RegisterDescriptor {
                name: field(0),
                email: field(1),
                password: field(2),
            }),
            "request-code" => Command::RequestCode {
                email: field(0),
                flow: match optional(fields.get(1).copied()) {
                    Some(name) => CodeFlow::Register { name },
                    None => CodeFlow::ResetPassword,
                },
            },
            "verify-code" => Command::VerifyCode(VerifyCodeDescriptor {
                email: field(0),
                code: field(1),
            }),
            "set-password" => Command::SetPassword(SetPasswordDescriptor {
                email: field(0),
                code: field(1),
                password: field(2),
                confirmation: field(3),
            }),
            "public" => Command::PublicEvents(match words.first() {
                Some(campus) => Some(id(campus)?),
                None => None,
            }),
            "public-event" => Command::PublicEvent(rest.to_owned()),
            "preregistered" => Command::Preregistered(rest.to_owned()),
            "self-register" => Command::SelfRegister {
                link: field(0),
                descriptor: SelfRegisterDescriptor {
                    student_name: field(1),
                    student_registration: optional(fields.get(2).copied()),
                    submission: SubmissionDescriptor {
                        student_email: field(3),
                        guardian_name: field(4),
                        guardian_email: field(5),
                    },
                },
                file: file(fields.get(6).copied()),
            },
            "submit" => Command::Submit {
                link: field(0),
                id: id(&field(1))?,
                descriptor: SubmissionDescriptor {
                    student_email: field(2),
                    guardian_name: field(3),
                    guardian_email: field(4),
                },
                file: file(fields.get(5).copied()),
            },
            "events" => Command::Events,
            "event" => Command::Event(id(rest)?),
            "template" => Command::Template(id(rest)?),
            "create-event" => Command::CreateEvent(event_descriptor(&fields)?),
            "edit-event" => {
                Command::EditEvent(id(&field(0))?, event_descriptor(&fields[1..])?)
            }
            "delete-event" => Command::DeleteEvent(id(rest)?),
            "authorizations" => Command::Authorizations(id(rest)?),
            "preregister" => Command::Preregister {
                event_id: id(&field(0))?,
                name: field(1),
                registration: optional(fields.get(2).copied()),
            },
            "approve" => Command::Approve {
                event_id: id(&field(0))?,
                id: id(&field(1))?,
            },
            "reject" => Command::Reject {
                event_id: id(&field(0))?,
                id: id(&field(1))?,
                reason: field(2),
            },
            "dates" => Command::Dates(id(rest)?),
            "presence" => match words.as_slice() {
                [event, auth, day, flag, value] => {
                    let value = match *value {
                        "on" => true,
                        "off" => false,
                        _ => return Err("presence value must be on or off".to_owned()),
                    };
                    Command::Presence {
                        event_id: id(event)?,
                        id: id(auth)?,
                        date: date(day)?,
                        update: match *flag {
                            "ida" => PresenceUpdate::outbound(value),
                            "volta" => PresenceUpdate::return_trip(value),
                            _ => return Err("presence flag must be ida or volta".to_owned()),
                        },
                    }
                }
                _ => {
                    return Err(
                        "usage: presence <event id> <id> <date> ida|volta on|off".to_owned(),
                    )
                }
            },
            "download" => Command::Download {
                event_id: id(&field(0))?,
                id: id(&field(1))?,
            },
            "campuses" => Command::Campuses,
            "create-campus" => Command::CreateCampus(rest.to_owned()),
            "update-campus" => Command::UpdateCampus(id(&field(0))?, field(1)),
            "delete-campus" => Command::DeleteCampus(id(rest)?),
            "users" => Command::Users,
            "create-user" => Command::CreateUser(UserDescriptor {
                name: field(0),
                email: field(1),
                role: role(&field(2))?,
                password: optional(fields.get(3).copied()),
                active: true,
                campus_id: None,
            }),
            "update-user" => Command::UpdateUser(
                id(&field(0))?,
                UserDescriptor {
                    name: field(1),
                    email: field(2),
                    role: role(&field(3))?,
                    active: match field(4).as_str() {
                        "active" => true,
                        "inactive" => false,
                        _ => return Err("user state must be active or inactive".to_owned()),
                    },
                    password: optional(fields.get(5).copied()),
                    campus_id: None,
                },
            ),
            "delete-user" => Command::DeleteUser(id(rest)?),
            other => return Err(format!("unknown command \"{other}\", try help")),
        })
    }

    /// The screen this command acts on, `None` for commands available
    /// everywhere.
    fn route(&self) -> Option<Route> {
        Some(match self {
            Command::Help
            | Command::Quit
            | Command::Go(_)
            | Command::WhoAmI
            | Command::Logout => return None,
            Command::Login { .. } => Route::Login,
            Command::Register(_) => Route::RegisterProfessor,
            Command::RequestCode {
                flow: CodeFlow::ResetPassword,
                ..
            } => Route::RecoverPassword,
            Command::RequestCode { .. } => Route::RegisterProfessor,
            Command::VerifyCode(_) => Route::VerifyCode,
            Command::SetPassword(_) => Route::SetPassword,
            Command::PublicEvents(_) => Route::PublicEvents,
            Command::PublicEvent(link) => Route::PublicEvent(link.to_owned()),
            Command::Preregistered(link)
            | Command::SelfRegister { link, .. }
            | Command::Submit { link, .. } => Route::Registration(link.to_owned()),
            Command::Events | Command::CreateEvent(_) | Command::DeleteEvent(_) => {
                Route::Dashboard
            }
            Command::Event(id)
            | Command::Template(id)
            | Command::EditEvent(id, _)
            | Command::Authorizations(id)
            | Command::Preregister { event_id: id, .. }
            | Command::Approve { event_id: id, .. }
            | Command::Reject { event_id: id, .. }
            | Command::Download { event_id: id, .. } => Route::EventDetails(*id),
            Command::Dates(id) | Command::Presence { event_id: id, .. } => {
                Route::Attendance(*id)
            }
            Command::Campuses
            | Command::CreateCampus(_)
            | Command::UpdateCampus(..)
            | Command::DeleteCampus(_) => Route::Campuses,
            Command::Users
            | Command::CreateUser(_)
            | Command::UpdateUser(..)
            | Command::DeleteUser(_) => Route::Users,
        })
    }
}

fn format_event(event: &Event) -> String {
    let mut line = format!("#{} {} {}", event.id, event.title, event.start_date);
    if let Some(end) = event.end_date.filter(|_| event.is_multi_day()) {
        let _ = write!(line, "..{end}");
    }
    if let Some(ref time) = event.time {
        let _ = write!(line, " {time}");
    }
    let _ = write!(
        line,
        " ({} authorizations, link {})",
        event.authorization_count, event.public_link
    );
    line
}

async fn attachment(path: Option<PathBuf>) -> Result<Option<Attachment>, Error> {
    match path {
        Some(path) => Ok(Some(Attachment::from_path(path).await?)),
        None => Ok(None),
    }
}

/// The terminal front-end: reads commands, checks them against the route
/// policy and prints their outcome.
pub struct Shell {
    session: Arc<Session>,
    lifecycle: Lifecycle,
    download_dir: PathBuf,
    location: Route,
}

impl Shell {
    pub fn new(session: Arc<Session>, lifecycle: Lifecycle, download_dir: PathBuf) -> Self {
        let location = route::navigate("/", &session.state());
        Self {
            session,
            lifecycle,
            download_dir,
            location,
        }
    }

    pub fn location(&self) -> &Route {
        &self.location
    }

    /// Runs one command line.
    pub async fn execute(&mut self, line: &str) -> Outcome {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(message) => return Outcome::Print(message),
        };

        if let Some(target) = command.route() {
            match route::resolve(target, &self.session.state()) {
                Resolution::Allow(route) => self.location = route,
                Resolution::Redirect(target) => {
                    self.location = route::navigate(&target.path(), &self.session.state());
                    return Outcome::Print(format!("redirected to {}", self.location));
                }
            }
        }

        Outcome::Print(match self.dispatch(command).await {
            Ok(Some(text)) => text,
            Ok(None) => return Outcome::Quit,
            Err(text) => text,
        })
    }

    /// Runs `command`, returning its output or the notification of its
    /// failure. `Ok(None)` ends the session.
    async fn dispatch(&mut self, command: Command) -> Result<Option<String>, String> {
        let resources = self.lifecycle.resources().clone();

        match command {
            Command::Help => Ok(Some(HELP.to_owned())),
            Command::Quit => Ok(None),
            Command::Go(path) => {
                self.location = route::navigate(&path, &self.session.state());
                Ok(Some(format!("at {}", self.location)))
            }
            Command::WhoAmI => Ok(Some(match self.session.state().user {
                Some(user) => format!("{} ({})", user.email, user.role.as_str()),
                None => "not logged in".to_owned(),
            })),
            Command::Login { email, password } => {
                let user = self.session.login(&email, &password).await?;
                self.location = route::navigate("/", &self.session.state());
                Ok(Some(format!(
                    "logged in as {} ({}), at {}",
                    user.email,
                    user.role.as_str(),
                    self.location
                )))
            }
            Command::Logout => {
                self.session.logout();
                self.location = route::navigate("/", &self.session.state());
                Ok(Some(format!("logged out, at {}", self.location)))
            }
            Command::Register(descriptor) => {
                let email = descriptor.email.clone();
                resources
                    .register(descriptor)
                    .await
                    .map_err(|err| err.notification("registration failed"))?;
                Ok(Some(format!("registered, a code was sent to {email}")))
            }
            Command::RequestCode { email, flow } => {
                resources
                    .request_code(&email, flow)
                    .await
                    .map_err(|err| err.notification("could not send the code"))?;
                Ok(Some(format!("code sent to {email}")))
            }
            Command::VerifyCode(descriptor) => {
                resources
                    .verify_code(descriptor)
                    .await
                    .map_err(|err| err.notification("invalid code"))?;
                Ok(Some("code verified".to_owned()))
            }
            Command::SetPassword(descriptor) => {
                resources
                    .set_password(descriptor)
                    .await
                    .map_err(|err| err.notification("could not set the password"))?;
                Ok(Some("password set, you can log in now".to_owned()))
            }
            Command::PublicEvents(campus_id) => {
                let events = resources
                    .public_events(campus_id)
                    .await
                    .map_err(|err| err.notification("could not load events"))?;
                Ok(Some(lines(events.iter().map(format_event), "no events")))
            }
            Command::PublicEvent(link) => {
                let event = resources
                    .public_event(&link)
                    .await
                    .map_err(|err| err.notification("event not found"))?;
                Ok(Some(format_event(&event)))
            }
            Command::Preregistered(link) => {
                let event = resources
                    .public_event(&link)
                    .await
                    .map_err(|err| err.notification("event not found"))?;
                let list = self
                    .lifecycle
                    .preregistered(event.id)
                    .await
                    .map_err(|err| err.notification("could not load students"))?;
                Ok(Some(lines(
                    list.iter()
                        .map(|auth| format!("#{} {}", auth.id, auth.student_name)),
                    "no pre-registered students",
                )))
            }
            Command::SelfRegister {
                link,
                descriptor,
                file,
            } => {
                let failed = |err: Error| err.notification("registration failed");
                let event = resources.public_event(&link).await.map_err(failed)?;
                let file = attachment(file).await.map_err(failed)?;
                let auth = self
                    .lifecycle
                    .self_register(event.id, descriptor, file)
                    .await
                    .map_err(failed)?;
                Ok(Some(format!(
                    "authorization #{} {}",
                    auth.id,
                    auth.status.label()
                )))
            }
            Command::Submit {
                link,
                id,
                descriptor,
                file,
            } => {
                let failed = |err: Error| err.notification("submission failed");
                let event = resources.public_event(&link).await.map_err(failed)?;
                let preregistered = self
                    .lifecycle
                    .preregistered(event.id)
                    .await
                    .map_err(failed)?;
                if !preregistered.iter().any(|auth| auth.id == id) {
                    return Err(format!(
                        "authorization #{id} is not pre-registered for this event"
                    ));
                }
                let file = attachment(file).await.map_err(failed)?;
                let auth = self
                    .lifecycle
                    .submit_existing(id, descriptor, file)
                    .await
                    .map_err(failed)?;
                Ok(Some(format!(
                    "authorization #{} {}",
                    auth.id,
                    auth.status.label()
                )))
            }
            Command::Events => {
                let events = resources
                    .events()
                    .await
                    .map_err(|err| err.notification("could not load events"))?;
                Ok(Some(lines(events.iter().map(format_event), "no events")))
            }
            Command::Event(id) => {
                let event = resources
                    .event(id)
                    .await
                    .map_err(|err| err.notification("event not found"))?;
                let mut text = format_event(&event);
                if let Some(ref description) = event.description {
                    let _ = write!(text, "\n{description}");
                }
                if let Some(ref location) = event.location {
                    let _ = write!(text, "\nat {location}");
                }
                Ok(Some(text))
            }
            Command::Template(id) => {
                let bytes = resources
                    .event_template(id)
                    .await
                    .map_err(|err| err.notification("file unavailable"))?;
                let path = self.download_dir.join(format!("modelo_evento_{id}.pdf"));
                tokio::fs::create_dir_all(&self.download_dir)
                    .await
                    .map_err(|_| "file unavailable".to_owned())?;
                tokio::fs::write(&path, bytes)
                    .await
                    .map_err(|_| "file unavailable".to_owned())?;
                Ok(Some(format!("saved {}", path.display())))
            }
            Command::CreateEvent(descriptor) => {
                let event = resources
                    .create_event(descriptor)
                    .await
                    .map_err(|err| err.notification("could not create the event"))?;
                Ok(Some(format!("created {}", format_event(&event))))
            }
            Command::EditEvent(id, descriptor) => {
                let event = resources
                    .update_event(id, descriptor)
                    .await
                    .map_err(|err| err.notification("could not update the event"))?;
                Ok(Some(format!("updated {}", format_event(&event))))
            }
            Command::DeleteEvent(id) => {
                resources
                    .delete_event(id)
                    .await
                    .map_err(|err| err.notification("could not delete the event"))?;
                Ok(Some(format!("event #{id} deleted")))
            }
            Command::Authorizations(event_id) => {
                let list = self
                    .lifecycle
                    .authorizations(event_id)
                    .await
                    .map_err(|err| err.notification("could not load authorizations"))?;
                Ok(Some(lines(
                    list.iter().map(|auth| {
                        let mut line = format!(
                            "#{} {} [{}]",
                            auth.id,
                            auth.student_name,
                            auth.status.label()
                        );
                        if let Some(ref reason) = auth.rejection_reason {
                            let _ = write!(line, " reason: {reason}");
                        }
                        let actions = actions_for(auth.status, auth.file_path.is_some());
                        if !actions.is_empty() {
                            let _ = write!(line, " ({})", actions.join(", "));
                        }
                        line
                    }),
                    "no authorizations",
                )))
            }
            Command::Preregister {
                event_id,
                name,
                registration,
            } => {
                let auth = self
                    .lifecycle
                    .preregister(event_id, &name, registration)
                    .await
                    .map_err(|err| err.notification("could not pre-register"))?;
                Ok(Some(format!(
                    "authorization #{} {}",
                    auth.id,
                    auth.status.label()
                )))
            }
            Command::Approve { event_id, id } => {
                let auth = self
                    .lifecycle
                    .approve(event_id, id)
                    .await
                    .map_err(|err| err.notification("could not approve"))?;
                Ok(Some(format!("authorization #{id} {}", auth.status.label())))
            }
            Command::Reject {
                event_id,
                id,
                reason,
            } => {
                let auth = self
                    .lifecycle
                    .reject(event_id, id, &reason)
                    .await
                    .map_err(|err| err.notification("could not reject"))?;
                Ok(Some(format!("authorization #{id} {}", auth.status.label())))
            }
            Command::Dates(event_id) => {
                let event = resources
                    .event(event_id)
                    .await
                    .map_err(|err| err.notification("event not found"))?;
                let dates: Vec<NaiveDate> = event.dates().collect();
                let selected = default_selected_date(&dates, today_utc());
                let attendance = self
                    .lifecycle
                    .attendance_list(event_id)
                    .await
                    .map_err(|err| err.notification("could not load attendance"))?;

                let mut text = lines(
                    dates.iter().map(|day| {
                        let mark = if Some(*day) == selected { "*" } else { " " };
                        format!("{mark} {day}")
                    }),
                    "the event has no valid dates",
                );
                if let Some(day) = selected {
                    for auth in &attendance {
                        let presence = auth.presence_on(day);
                        let _ = write!(
                            text,
                            "\n#{} {}: ida {}, volta {}",
                            auth.id,
                            auth.student_name,
                            yes_no(presence.outbound),
                            yes_no(presence.return_trip)
                        );
                    }
                }
                Ok(Some(text))
            }
            Command::Presence {
                event_id,
                id,
                date,
                update,
            } => {
                let presence = self
                    .lifecycle
                    .set_presence(event_id, id, date, update)
                    .await
                    .map_err(|err| err.notification("could not record presence"))?;
                Ok(Some(format!(
                    "#{id} on {date}: ida {}, volta {}",
                    yes_no(presence.outbound),
                    yes_no(presence.return_trip)
                )))
            }
            Command::Download { event_id, id } => {
                let path = self
                    .lifecycle
                    .download_file(event_id, id, &self.download_dir)
                    .await
                    .map_err(|err| err.notification("file unavailable"))?;
                Ok(Some(format!("saved {}", path.display())))
            }
            Command::Campuses => {
                let campuses = resources
                    .campuses()
                    .await
                    .map_err(|err| err.notification("could not load campuses"))?;
                Ok(Some(lines(
                    campuses
                        .iter()
                        .map(|campus| format!("#{} {}", campus.id, campus.name)),
                    "no campuses",
                )))
            }
            Command::CreateCampus(name) => {
                let campus = resources
                    .create_campus(CampusDescriptor { name })
                    .await
                    .map_err(|err| err.notification("could not create the campus"))?;
                Ok(Some(format!("campus #{} {} created", campus.id, campus.name)))
            }
            Command::UpdateCampus(id, name) => {
                let campus = resources
                    .update_campus(id, CampusDescriptor { name })
                    .await
                    .map_err(|err| err.notification("could not update the campus"))?;
                Ok(Some(format!("campus #{} renamed to {}", campus.id, campus.name)))
            }
            Command::DeleteCampus(id) => {
                resources
                    .delete_campus(id)
                    .await
                    .map_err(|err| err.notification("could not delete the campus"))?;
                Ok(Some(format!("campus #{id} deleted")))
            }
            Command::Users => {
                let users = resources
                    .users()
                    .await
                    .map_err(|err| err.notification("could not load users"))?;
                Ok(Some(lines(
                    users.iter().map(|user| {
                        format!(
                            "#{} {} <{}> {}{}",
                            user.id,
                            user.name,
                            user.email,
                            user.role.as_str(),
                            if user.active { "" } else { " (inactive)" }
                        )
                    }),
                    "no users",
                )))
            }
            Command::CreateUser(descriptor) => {
                let user = resources
                    .create_user(descriptor)
                    .await
                    .map_err(|err| err.notification("could not create the user"))?;
                Ok(Some(format!("user #{} {} created", user.id, user.email)))
            }
            Command::UpdateUser(id, descriptor) => {
                let user = resources
                    .update_user(id, descriptor)
                    .await
                    .map_err(|err| err.notification("could not update the user"))?;
                Ok(Some(format!("user #{} {} updated", user.id, user.email)))
            }
            Command::DeleteUser(id) => {
                resources
                    .delete_user(id)
                    .await
                    .map_err(|err| err.notification("could not delete the user"))?;
                Ok(Some(format!("user #{id} deleted")))
            }
        }
    }

    /// Reads commands from stdin until it closes or `quit` is entered.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();
        let mut output = tokio::io::stdout();

        output
            .write_all(format!("at {}, type help for commands\n", self.location).as_bytes())
            .await?;
        while let Some(line) = input.next_line().await? {
            match self.execute(&line).await {
                Outcome::Print(text) => {
                    output.write_all(text.as_bytes()).await?;
                    output.write_all(b"\n").await?;
                    output.flush().await?;
                }
                Outcome::Quit => break,
            }
        }

        Ok(())
    }
}

fn lines(items: impl Iterator<Item = String>, empty: &str) -> String {
    let text = items.collect::<Vec<_>>().join("\n");
    if text.is_empty() {
        empty.to_owned()
    } else {
        text
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
