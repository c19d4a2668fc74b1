#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flow_editor=info".into()),
        )
        .init();
    flow_editor::native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // This binary is not meant to be used for WASM.
    // Use the library's start() function instead.
}
