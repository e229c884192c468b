// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_words_per_utterance: usize,
    max_word_length: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_derivation_depth: usize,
    max_chart_items: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_utterance: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=VOICE_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=VOICE_CONFIG_DIR");

    let profile = env::var("VOICE_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("VOICE_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the voice_grammar directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_WORDS: usize = 4096;
    const ABSOLUTE_MAX_DEPTH: usize = 65_536;

    if config.lexical.max_words_per_utterance == 0 {
        panic!("LIMITS: max_words_per_utterance must be at least 1");
    }

    if config.lexical.max_words_per_utterance > ABSOLUTE_MAX_WORDS {
        panic!("LIMITS: max_words_per_utterance exceeds absolute maximum");
    }

    if config.syntax.max_derivation_depth > ABSOLUTE_MAX_DEPTH {
        panic!("LIMITS: max_derivation_depth exceeds absolute maximum");
    }

    // Every chained command nests a few levels deep, so the derivation must
    // have room for the longest utterance the lexer lets through.
    if config.syntax.max_derivation_depth < config.lexical.max_words_per_utterance * 4 {
        panic!("LIMITS: max_derivation_depth too small for max_words_per_utterance");
    }

    if config.logging.max_log_message_length < 64 {
        panic!("LIMITS: max_log_message_length must be at least 64");
    }

    if profile == "production" && config.lexical.max_words_per_utterance > 512 {
        panic!("PRODUCTION: max_words_per_utterance too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_WORDS_PER_UTTERANCE: usize = {};
        pub const MAX_WORD_LENGTH: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_DERIVATION_DEPTH: usize = {};
        pub const MAX_CHART_ITEMS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_UTTERANCE: usize = {};
    }}
}}
"#,
        profile,
        // Lexical
        config.lexical.max_words_per_utterance,
        config.lexical.max_word_length,
        // Syntax
        config.syntax.max_derivation_depth,
        config.syntax.max_chart_items,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_utterance,
    );

    fs::write(output_path, constants_code).unwrap();
}
