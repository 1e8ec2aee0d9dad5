use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, VecDeque},
    rc::Rc,
    time::Duration,
};

use crate::io::{
    Console, Device, FileSystem, ServiceError, ServiceResult, System,
    keymap::{char_key, key_code},
    system::LocalTime,
};

/// A service call observed by a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Press {
        buttons:  Vec<String>,
        duration: Duration,
    },
    Hold(Vec<String>),
    Release(Vec<String>),
    MoveTo {
        x:        i64,
        y:        i64,
        duration: Duration,
    },
    Scroll {
        amount:   i64,
        duration: Duration,
    },
    Type {
        text:  String,
        delay: Duration,
    },
    Sleep(Duration),
    Command(String),
}

#[derive(Debug, Default)]
struct Recording {
    events:  Vec<Event>,
    output:  Vec<String>,
    prompts: String,
    input:   VecDeque<String>,
    files:   BTreeMap<String, String>,
    dirs:    BTreeSet<String>,
    held:    BTreeSet<u16>,
    cursor:  (i64, i64),
    time:    LocalTime,
    millis:  i64,
    random:  i64,
}

/// An in-memory host implementing every service trait.
///
/// Clones share one recording, so a test keeps a clone while the session
/// owns the boxed services. Nothing sleeps and nothing touches the real
/// file system; `random` counts up from zero and the clock stands still
/// unless [`Recorder::set_time`] moves it.
///
/// # Example
/// ```
/// use kmsl::{io::Recorder, session::Session};
///
/// let recorder = Recorder::new();
/// let mut session = Session::batch(kmsl::io::Services::recording(&recorder));
/// session.run("print \"hi\" * 3");
///
/// assert_eq!(recorder.output(), ["hihihi"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Rc<RefCell<Recording>>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose console will answer `input` with `lines`, in order.
    #[must_use]
    pub fn with_input(lines: &[&str]) -> Self {
        let recorder = Self::new();
        recorder.inner
                .borrow_mut()
                .input
                .extend(lines.iter().map(ToString::to_string));
        recorder
    }

    /// Every line written to the console.
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.inner.borrow().output.clone()
    }

    /// Everything written without a line break, such as REPL prompts.
    #[must_use]
    pub fn prompts(&self) -> String {
        self.inner.borrow().prompts.clone()
    }

    /// Every device, sleep and shell event, in order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.inner.borrow().events.clone()
    }

    #[must_use]
    pub fn file(&self, path: &str) -> Option<String> {
        self.inner.borrow().files.get(path).cloned()
    }

    #[must_use]
    pub fn has_dir(&self, path: &str) -> bool {
        self.inner.borrow().dirs.contains(path)
    }

    pub fn set_file(&self, path: &str, contents: &str) {
        self.inner.borrow_mut().files.insert(path.to_string(), contents.to_string());
    }

    pub fn set_time(&self, time: LocalTime) {
        self.inner.borrow_mut().time = time;
    }

    fn record(&self, event: Event) {
        self.inner.borrow_mut().events.push(event);
    }

    fn codes(buttons: &[String]) -> ServiceResult<Vec<u16>> {
        buttons.iter()
               .map(|b| key_code(b).ok_or_else(|| ServiceError::UnknownButton(b.clone())))
               .collect()
    }

    fn missing(operation: &'static str, path: &str) -> ServiceError {
        ServiceError::File { operation,
                             path: path.to_string(),
                             source: std::io::ErrorKind::NotFound.into() }
    }
}

impl Device for Recorder {
    fn press(&mut self, buttons: &[String], duration: Duration) -> ServiceResult<()> {
        Self::codes(buttons)?;
        self.record(Event::Press { buttons: buttons.to_vec(),
                                   duration });
        Ok(())
    }

    fn hold(&mut self, buttons: &[String]) -> ServiceResult<()> {
        let codes = Self::codes(buttons)?;
        self.inner.borrow_mut().held.extend(codes);
        self.record(Event::Hold(buttons.to_vec()));
        Ok(())
    }

    fn release(&mut self, buttons: &[String]) -> ServiceResult<()> {
        let codes = Self::codes(buttons)?;
        let mut inner = self.inner.borrow_mut();
        for code in codes {
            inner.held.remove(&code);
        }
        inner.events.push(Event::Release(buttons.to_vec()));
        Ok(())
    }

    fn move_to(&mut self, x: i64, y: i64, duration: Duration) -> ServiceResult<()> {
        self.inner.borrow_mut().cursor = (x, y);
        self.record(Event::MoveTo { x, y, duration });
        Ok(())
    }

    fn scroll(&mut self, amount: i64, duration: Duration) -> ServiceResult<()> {
        self.record(Event::Scroll { amount, duration });
        Ok(())
    }

    fn type_text(&mut self, text: &str, delay: Duration) -> ServiceResult<()> {
        if let Some(c) = text.chars().find(|c| char_key(*c).is_none()) {
            return Err(ServiceError::UnknownButton(c.to_string()));
        }
        self.record(Event::Type { text: text.to_string(),
                                  delay });
        Ok(())
    }

    fn is_pressed(&mut self, button: &str) -> ServiceResult<bool> {
        let code = key_code(button).ok_or_else(|| ServiceError::UnknownButton(button.to_string()))?;
        Ok(self.inner.borrow().held.contains(&code))
    }

    fn cursor(&mut self) -> ServiceResult<(i64, i64)> {
        Ok(self.inner.borrow().cursor)
    }
}

impl FileSystem for Recorder {
    fn read(&mut self, path: &str) -> ServiceResult<String> {
        self.file(path).ok_or_else(|| Self::missing("read", path))
    }

    fn write(&mut self, path: &str, contents: &str) -> ServiceResult<()> {
        self.set_file(path, contents);
        Ok(())
    }

    fn append(&mut self, path: &str, contents: &str) -> ServiceResult<()> {
        self.inner
            .borrow_mut()
            .files
            .entry(path.to_string())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    fn create(&mut self, path: &str) -> ServiceResult<()> {
        self.set_file(path, "");
        Ok(())
    }

    fn remove(&mut self, path: &str) -> ServiceResult<()> {
        self.inner
            .borrow_mut()
            .files
            .remove(path)
            .map(drop)
            .ok_or_else(|| Self::missing("remove", path))
    }

    fn exists(&mut self, path: &str) -> bool {
        let inner = self.inner.borrow();
        inner.files.contains_key(path) || inner.dirs.contains(path)
    }

    fn copy(&mut self, from: &str, to: &str) -> ServiceResult<()> {
        let contents = self.read(from).map_err(|_| Self::missing("copy", from))?;
        self.set_file(to, &contents);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> ServiceResult<()> {
        let mut inner = self.inner.borrow_mut();
        let contents = inner.files.remove(from).ok_or_else(|| Self::missing("rename", from))?;
        inner.files.insert(to.to_string(), contents);
        Ok(())
    }

    fn create_dir(&mut self, path: &str) -> ServiceResult<()> {
        self.inner.borrow_mut().dirs.insert(path.to_string());
        Ok(())
    }
}

impl System for Recorder {
    fn local_time(&mut self) -> LocalTime {
        self.inner.borrow().time
    }

    fn millis(&mut self) -> i64 {
        self.inner.borrow().millis
    }

    fn random(&mut self) -> i64 {
        let mut inner = self.inner.borrow_mut();
        let value = inner.random;
        inner.random += 1;
        value
    }

    fn sleep(&mut self, duration: Duration) {
        let mut inner = self.inner.borrow_mut();
        inner.millis =
            inner.millis.saturating_add(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX));
        inner.events.push(Event::Sleep(duration));
    }

    fn run_command(&mut self, command: &str) -> ServiceResult<i32> {
        self.record(Event::Command(command.to_string()));
        Ok(0)
    }
}

impl Console for Recorder {
    fn write_line(&mut self, text: &str) -> ServiceResult<()> {
        self.inner.borrow_mut().output.push(text.to_string());
        Ok(())
    }

    fn write(&mut self, text: &str) -> ServiceResult<()> {
        self.inner.borrow_mut().prompts.push_str(text);
        Ok(())
    }

    fn read_line(&mut self) -> ServiceResult<Option<String>> {
        Ok(self.inner.borrow_mut().input.pop_front())
    }
}
