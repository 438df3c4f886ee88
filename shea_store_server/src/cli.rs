use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 18] = [
        "RUST_LOG",
        "SHEA_HOST",
        "SHEA_PORT",
        "SHEA_DATABASE_URL",
        "SHEA_PUBLIC_URL",
        "SHEA_SESSION_BACKEND",
        "SHEA_SESSION_TTL_HOURS",
        "SHEA_SECURE_COOKIES",
        "SHEA_SESSION_REAPER_INTERVAL",
        "SHEA_SEED_SAMPLE_DATA",
        "SHEA_USE_X_FORWARDED_FOR",
        "SHEA_USE_FORWARDED",
        "SHEA_CINETPAY_SITE_ID",
        "SHEA_CINETPAY_BASE_URL",
        "SHEA_CINETPAY_TIMEOUT",
        "SHEA_CINETPAY_PLACEHOLDER_PHONE",
        "SHEA_CINETPAY_HMAC_CHECKS",
        "SHEA_CINETPAY_WHITELIST",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
