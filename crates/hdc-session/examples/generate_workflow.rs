//! Drive one conversation end to end and print the generated documents

use hdc_core::documents::RequestMethod;
use hdc_core::Archetype;
use hdc_session::WorkflowSession;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let mut session = WorkflowSession::new();
    session.select_archetype(Archetype::ApiCallWithTransform)?;
    session.use_existing_connection()?;

    session.set_workflow_name("Referrals")?;
    session.set_method(RequestMethod::Get)?;
    session.set_path("/patients/{patientid}/referralauths?status={status}")?;
    session.set_response_sample(json!({
        "referrals": [
            {"id": "r1", "state": "open"},
            {"id": "r2", "state": "closed"}
        ]
    }))?;
    session.set_desired_output(json!({
        "referrals": [
            {"referralId": "r1", "status": "open"},
            {"referralId": "r2", "status": "closed"}
        ]
    }))?;

    let bundle = session.generate()?;

    for (kind, document) in bundle.documents.iter() {
        println!("## {kind}");
        println!("{}", serde_json::to_string_pretty(document)?);
        println!();
    }

    println!("## payload");
    println!("{}", serde_json::to_string_pretty(&bundle.payload_params)?);

    for warning in &bundle.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}
