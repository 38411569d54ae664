//! Bakes the gymxpctl version into the binary as `GYMXP_VERSION`.

const VERSION_ENV: &str = "GYMXP_VERSION";

fn main() {
    println!("cargo:rerun-if-env-changed={}", VERSION_ENV);

    let version = match std::env::var(VERSION_ENV) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => env!("CARGO_PKG_VERSION").to_string(),
    };
    println!("cargo:rustc-env={}={}", VERSION_ENV, version);
}
