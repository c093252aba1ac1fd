//! Line commands for the interactive `notes` session.

use studynotes_core::{
    courses, sort_notes, CourseFilter, Note, NoteDraft, NoteFilter, NoteId, NotesStore,
    RecentSearches, SortOrder, ValidationError,
};

const PREVIEW_CHARS: usize = 60;
const DATE_FORMAT: &str = "%b %e %H:%M";

pub const HELP: &str = "\
add <course> | <title> | <content>      create a note
edit <id> <course> | <title> | <content> replace a note's fields
rm <id>                                   delete a note
show <id>                                 print one note
ls [date|recent|course|title]            list notes (date: newest created first)
find <text> [@<course>]                   search title, content and course
recent [clear]                            last five searches
courses                                   list course labels in use
quit                                      leave (notes are discarded)";

#[derive(Debug, PartialEq)]
pub enum Command {
    Add(NoteDraft),
    Edit(NoteId, NoteDraft),
    Remove(NoteId),
    Show(NoteId),
    List(SortOrder),
    Find(NoteFilter),
    Recent,
    ClearRecent,
    Courses,
    Help,
    Quit,
}

/// Parse one input line. Blank lines give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ShellError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let cmd = match word {
        "add" => Command::Add(parse_fields(rest)?),
        "edit" => {
            let (id, fields) = rest
                .split_once(char::is_whitespace)
                .ok_or(ShellError::Usage("edit <id> <course> | <title> | <content>"))?;
            Command::Edit(NoteId::from(id), parse_fields(fields)?)
        }
        "rm" => Command::Remove(parse_id(rest, "rm <id>")?),
        "show" => Command::Show(parse_id(rest, "show <id>")?),
        "ls" => Command::List(match rest {
            "" => SortOrder::StoreOrder,
            "date" => SortOrder::Created,
            "recent" => SortOrder::RecentlyUpdated,
            "course" => SortOrder::Course,
            "title" => SortOrder::Title,
            _ => return Err(ShellError::Usage("ls [date|recent|course|title]")),
        }),
        "find" => Command::Find(parse_filter(rest)),
        "recent" => match rest {
            "" => Command::Recent,
            "clear" => Command::ClearRecent,
            _ => return Err(ShellError::Usage("recent [clear]")),
        },
        "courses" => Command::Courses,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ShellError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}

fn parse_id(rest: &str, usage: &'static str) -> Result<NoteId, ShellError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(ShellError::Usage(usage));
    }
    Ok(NoteId::from(rest))
}

fn parse_fields(rest: &str) -> Result<NoteDraft, ShellError> {
    let mut parts = rest.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(course), Some(title), Some(content)) => Ok(NoteDraft::new(title, content, course)?),
        _ => Err(ShellError::Usage("<course> | <title> | <content>")),
    }
}

/// A course suffix starts with an `@` at the beginning of a word, so `a@b.com` stays in the query.
fn parse_filter(rest: &str) -> NoteFilter {
    let at = rest
        .char_indices()
        .rev()
        .find(|&(i, c)| c == '@' && (i == 0 || rest[..i].ends_with(char::is_whitespace)))
        .map(|(i, _)| i);
    let (query, course) = match at {
        Some(i) => (rest[..i].trim(), rest[i + 1..].parse().unwrap_or_default()),
        None => (rest, CourseFilter::All),
    };
    let filter = NoteFilter::new().with_course(course);
    if query.is_empty() {
        filter
    } else {
        filter.with_query(query)
    }
}

/// State of one interactive session. Dropped on exit.
#[derive(Debug, Default)]
pub struct Session {
    pub store: NotesStore,
    pub recent: RecentSearches,
}

/// Run a command against the session and return the lines to print.
pub fn execute(session: &mut Session, cmd: Command) -> Vec<String> {
    let store = &mut session.store;
    match cmd {
        Command::Add(d) => {
            let id = store.add_note(d.title, d.content, d.course);
            vec![format!("Added {}", id)]
        }
        Command::Edit(id, d) => match store.update_note(&id, d.title, d.content, d.course) {
            Ok(note) => vec![format!("Updated {}", note.id)],
            Err(e) => vec![format!("Error: {}", e)],
        },
        Command::Remove(id) => match store.delete_note(&id) {
            Ok(note) => vec![format!("Deleted {:?}", note.title)],
            Err(e) => vec![format!("Error: {}", e)],
        },
        Command::Show(id) => match store.get_note_by_id(&id) {
            Some(n) => vec![
                format!("{} [{}]", n.title, n.course),
                format!(
                    "id {}  created {}  updated {}",
                    n.id,
                    n.created_at.format(DATE_FORMAT),
                    n.updated_at.format(DATE_FORMAT)
                ),
                n.content.clone(),
            ],
            None => vec![format!("Error: note not found: {}", id)],
        },
        Command::List(order) => {
            let mut notes: Vec<&Note> = store.notes().iter().collect();
            sort_notes(&mut notes, order);
            list_lines(&notes)
        }
        Command::Find(filter) => {
            if let Some(q) = &filter.query {
                session.recent.push(q);
            }
            list_lines(&store.search(&filter))
        }
        Command::Recent => session.recent.iter().map(str::to_string).collect(),
        Command::ClearRecent => {
            session.recent.clear();
            vec!["Recent searches cleared".to_string()]
        }
        Command::Courses => courses(store.notes()),
        Command::Help => HELP.lines().map(str::to_string).collect(),
        Command::Quit => Vec::new(),
    }
}

fn list_lines(notes: &[&Note]) -> Vec<String> {
    let mut lines = vec![format!("{} note(s)", notes.len())];
    lines.extend(notes.iter().map(|n| {
        format!("  {}  [{}] {}  {}", n.id, n.course, n.title, n.preview(PREVIEW_CHARS))
    }));
    lines
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ShellError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
