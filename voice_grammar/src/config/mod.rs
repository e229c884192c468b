//! Configuration module for the voice grammar
//! Automatically uses generated constants from TOML configuration

// Include generated constants from build.rs
// This file is generated at compile time from the workspace TOML configuration
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("VOICE_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("VOICE_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_constants_are_consistent() {
        assert!(compile_time::lexical::MAX_WORDS_PER_UTTERANCE > 0);
        assert!(compile_time::lexical::MAX_WORD_LENGTH > 0);
        assert!(
            compile_time::syntax::MAX_DERIVATION_DEPTH
                >= compile_time::lexical::MAX_WORDS_PER_UTTERANCE
        );
        assert!(compile_time::logging::MAX_LOG_EVENTS_PER_UTTERANCE > 0);
    }

    #[test]
    fn test_build_info() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
