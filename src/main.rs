#![cfg_attr(windows, windows_subsystem = "windows")]

mod association;
mod config;
mod elevate;
mod java;
mod launcher;
mod logging;
mod paths;
mod registry;
mod runner;
mod ui;
// Model of the standalone viewport-fix script shipped with the web page;
// nothing in the launcher itself calls it.
mod viewport;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    // One top-level catch: anything propagated (an association write
    // failure, mostly) becomes a single blocking dialog.
    if let Err(err) = runner::run(&args) {
        ui::alert(config::PRODUCT_NAME, &format!("{err:#}"));
    }
}
