#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod config;
pub mod data;
pub mod error;
pub mod fetch;
pub mod format;
pub mod state;
pub mod urls;
pub mod view;

pub use view::RainStatusView;

/// Log a report with its full cause chain and help text.
pub fn log_error(e: miette::Report) {
    let mut buf = String::new();
    let _ = miette::GraphicalReportHandler::new().render_report(&mut buf, e.as_ref());
    log::error!("{}", buf);
}
