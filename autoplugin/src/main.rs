//! autoplugin demo server entry point
//!
//! サンプル関数（add, hello, pow）を登録し、マニフェスト生成とサーバー起動を行う

use anyhow::Context;
use autoplugin::cli::{generate::GenerateArgs, serve::ServeArgs, Cli, Commands};
use autoplugin::{
    logging, manifest, plugin_fn, server, Availability, PluginApp, RegisterOptions,
};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

plugin_fn! {
    async fn hello(name: String, age: i64 = 5) -> String {
        format!("Hello, {}! Age {}.", name, age)
    }
}

plugin_fn! {
    /// Add two numbers together.
    async fn add(a: i64, b: i64) -> i64 {
        a + b
    }
}

plugin_fn! {
    /// Raise a number to a power.
    fn pow(base: i64, power: u32 = 2) -> i64 {
        base.pow(power)
    }
}

/// サンプル関数を登録する
///
/// `strict` でなければ、説明文を生成できない環境では hello に固定の説明を付ける
async fn register_demo(mut app: PluginApp, strict: bool) -> anyhow::Result<PluginApp> {
    let mut hello_options = RegisterOptions::new().methods(["GET", "POST"]);
    if !strict {
        if let Availability::Unavailable { missing } = app.generator().availability() {
            warn!(
                missing = %missing,
                "Description generation unavailable, using a fixed description for hello"
            );
            hello_options = hello_options.description("Greets a person by name and age.");
        }
    }
    app.register(hello::spec(), hello_options).await?;

    app.register(add::spec(), RegisterOptions::new().methods(["GET"]))
        .await?;
    app.register(
        pow::spec(),
        RegisterOptions::new().path("math/pow").methods(["GET", "POST"]),
    )
    .await?;

    Ok(app)
}

async fn build_app(well_known_dir: &Path, strict: bool) -> anyhow::Result<PluginApp> {
    let app = PluginApp::new()
        .title("Example Plugin")
        .serve_well_known(well_known_dir);
    register_demo(app, strict).await
}

fn run_generate(app: &PluginApp, args: &GenerateArgs) -> anyhow::Result<()> {
    let report = manifest::generate(app, &args.manifest_config())
        .context("failed to generate manifest documents")?;
    for path in &report.written {
        info!(path = %path.display(), "Generated");
    }
    for path in &report.skipped {
        info!(path = %path.display(), "Kept existing file");
    }
    Ok(())
}

async fn run_serve(app: &PluginApp, args: &ServeArgs) -> anyhow::Result<()> {
    server::launch(app, &args.host, args.port)
        .await
        .context("server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init().context("failed to initialize logging")?;
    let strict = cli.strict_descriptions;

    match cli.command {
        Some(Commands::Serve(args)) => {
            let app = build_app(&args.well_known_dir, strict).await?;
            run_serve(&app, &args).await
        }
        Some(Commands::Generate(args)) => {
            let app = build_app(&args.out_dir, strict).await?;
            run_generate(&app, &args)
        }
        None => {
            let generate_args = GenerateArgs::default();
            let serve_args = ServeArgs {
                well_known_dir: generate_args.out_dir.clone(),
                ..ServeArgs::default()
            };
            let app = build_app(&serve_args.well_known_dir, strict).await?;
            run_generate(&app, &generate_args)?;
            run_serve(&app, &serve_args).await
        }
    }
}
