use std::sync::OnceLock;

use log::{debug, error};
use tracing_subscriber::prelude::*;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::commands::Verbosity;

static LOGGER_HANDLE: OnceLock<Handle<EnvFilter, Registry>> = OnceLock::new();

/// The default filter for a verbosity level, `RUST_LOG` takes precedence.
fn log_filter(verbosity: Verbosity) -> &'static str {
    match verbosity {
        // Show only errors
        Verbosity::Quiet => "off,ezybookmark=error",
        // Warnings include failed background requests
        Verbosity::Verbose(0) => {
            "off,ezybookmark=warn,ezybookmark_sdk=warn,ezybookmark_catalog=warn"
        },
        Verbosity::Verbose(1) => {
            "off,ezybookmark=info,ezybookmark_sdk=info,ezybookmark_catalog=info"
        },
        // Every request and state change
        Verbosity::Verbose(2) => {
            "off,ezybookmark=debug,ezybookmark_sdk=debug,ezybookmark_catalog=debug"
        },
        Verbosity::Verbose(3) => {
            "off,ezybookmark=trace,ezybookmark_sdk=trace,ezybookmark_catalog=trace"
        },
        // Also show debug from the HTTP stack
        Verbosity::Verbose(4) => {
            "debug,ezybookmark=trace,ezybookmark_sdk=trace,ezybookmark_catalog=trace"
        },
        Verbosity::Verbose(_) => "trace",
    }
}

pub(crate) fn init_logger(verbosity: Option<Verbosity>) {
    let verbosity = verbosity.unwrap_or_default();

    let filter_handle = LOGGER_HANDLE.get_or_init(|| {
        let (subscriber, reload_handle) = create_registry_and_filter_reload_handle();
        subscriber.init();
        reload_handle
    });

    update_filters(filter_handle, log_filter(verbosity));
}

pub fn update_filters(filter_handle: &Handle<EnvFilter, Registry>, log_filter: &str) {
    let result = filter_handle.modify(|layer| {
        match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_filter)) {
            Ok(new_filter) => *layer = new_filter,
            Err(err) => {
                error!("Updating logger filter failed: {}", err);
            },
        };
    });
    if let Err(err) = result {
        error!("Updating logger filter failed: {}", err);
    }
}

fn create_registry_and_filter_reload_handle() -> (
    impl tracing_subscriber::layer::SubscriberExt,
    Handle<EnvFilter, Registry>,
) {
    debug!("Initializing logger");
    // Start at `trace` and narrow the filter down on reload,
    // the first filter caps what the `log` bridge lets through.
    let filter = EnvFilter::new("trace");
    let (filter, filter_reload_handle) = tracing_subscriber::reload::Layer::new(filter);
    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(tracing_subscriber::fmt::format())
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(log_layer);

    (registry, filter_reload_handle)
}
