use std::fs;
use std::path::Path;

// Defines read from wifi_config.h and exported as compile-time env vars
const DEFINES: [(&str, &str); 4] = [
    ("WIFI_SSID", ""),
    ("WIFI_PASSWORD", ""),
    ("UPLOAD_HOST", "172.20.10.5"),
    ("UPLOAD_PORT", "8080"),
];

fn main() -> anyhow::Result<()> {
    // Necessary for ESP-IDF
    embuild::espidf::sysenv::output();

    // Add crash log helper for better panic diagnostics
    println!("cargo:rustc-link-arg=-Wl,--undefined=esp_backtrace_print_app_description");

    let config_path = "wifi_config.h";
    println!("cargo:rerun-if-changed={}", config_path);

    let contents = if Path::new(config_path).exists() {
        fs::read_to_string(config_path)?
    } else {
        println!("cargo:warning=wifi_config.h not found! Copy wifi_config.h.example to wifi_config.h and add your credentials.");
        String::new()
    };

    for (name, default) in DEFINES {
        let value = find_define(&contents, name).unwrap_or(default);
        println!("cargo:rustc-env={}={}", name, value);
    }

    Ok(())
}

fn find_define<'a>(contents: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("#define {}", name);
    contents
        .lines()
        .find(|l| l.trim_start().starts_with(&needle) && l.split_whitespace().nth(1) == Some(name))
        .and_then(|l| l.split('"').nth(1))
}
