/// Validate that the pipeline is properly configured
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::lexical::validate_tokenization()?;

    crate::grammar::validate_grammar().map_err(|issues| {
        let issues: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
        format!("Grammar validation failed: {}", issues.join("; "))
    })?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 2,
        "productions" => crate::grammar::grammar().productions().len()
    );

    Ok(())
}
