fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml("data/pinyin.toml", include_str!("data/pinyin.toml"));
    validate_toml("data/wade_giles.toml", include_str!("data/wade_giles.toml"));
    validate_toml("data/gr.toml", include_str!("data/gr.toml"));
    validate_toml(
        "data/mandarin_ipa.toml",
        include_str!("data/mandarin_ipa.toml"),
    );
    validate_toml("data/braille.toml", include_str!("data/braille.toml"));
    validate_toml("data/jyutping.toml", include_str!("data/jyutping.toml"));
    validate_toml(
        "data/shanghainese_ipa.toml",
        include_str!("data/shanghainese_ipa.toml"),
    );
}

fn validate_toml(path: &str, content: &str) {
    println!("cargo:rerun-if-changed={path}");
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}
