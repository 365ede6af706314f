mod browser;
mod launcher;
mod quiet;

pub use browser::ChromeBrowser;
pub use launcher::HeadlessChromeLauncher;
