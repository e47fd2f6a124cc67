//! The permitting and research agents: personas, task prompts, and the
//! tool plans those prompts describe.

use solarsite_core::{Settings, SystemDetails};

use crate::tools::{
    CLASSIFY_JURISDICTION, ClassifyJurisdictionTool, GENERATE_PERMIT_FORM, GeneratePermitFormTool,
    SITE_IMPACT_RESEARCH, SiteImpactResearchTool,
};
use crate::{AgentProfile, Task, ToolCall, Toolbox};
use std::sync::Arc;

pub fn permitting_agent() -> AgentProfile {
    AgentProfile {
        role: "Solar Permitting Specialist".into(),
        goal: "Process addresses to classify jurisdictions and generate accurate solar permit applications".into(),
        backstory: "You are an expert in solar permitting across California jurisdictions. \
                    You know the specific requirements, forms, and processes for each city and county. \
                    You excel at auto-filling permit applications with accurate information."
            .into(),
        allow_delegation: false,
    }
}

pub fn research_agent() -> AgentProfile {
    AgentProfile {
        role: "Solar Site Feasibility Research Specialist".into(),
        goal: "Research and assess site feasibility for solar project development".into(),
        backstory: "You analyze regulatory environment for solar projects".into(),
        allow_delegation: false,
    }
}

pub fn permitting_toolbox(settings: &Settings) -> Toolbox {
    Toolbox::new()
        .with(Arc::new(ClassifyJurisdictionTool))
        .with(Arc::new(GeneratePermitFormTool::from_settings(settings)))
}

pub fn research_toolbox(research: SiteImpactResearchTool) -> Toolbox {
    Toolbox::new().with(Arc::new(research))
}

/// Classify the address, then fill a permit form for it.
pub fn permitting_task(address: &str, system_size: &str, panel_count: &str) -> Task {
    let details = SystemDetails::for_system(system_size, panel_count).to_json_string();

    let description = format!(
        "For the solar permit application at the address: {address}\n\
         \n\
         **Your plan:**\n\
         1. Use `{CLASSIFY_JURISDICTION}` with the address \"{address}\" to determine the jurisdiction.\n\
         \u{20}  **Important:** Extract only the pure JSON output from this tool's response.\n\
         2. Then, use `{GENERATE_PERMIT_FORM}` with the original address,\n\
         \u{20}  the **exact JSON string output from `{CLASSIFY_JURISDICTION}`** as the `jurisdiction_data` argument,\n\
         \u{20}  and the following system details as the `system_details` argument: `{details}`.\n\
         \n\
         **Your final output MUST be a JSON object containing the complete solar permit package.**"
    );

    let expected_output = format!(
        "Complete solar permit package in JSON format for {address}, including:\n\
         1. Jurisdiction classification\n\
         2. Fully filled permit application form\n\
         3. Requirements checklist for that jurisdiction\n\
         4. Fee information and processing timeline\n\
         5. Contact information for the permit office\n\
         6. Next steps for permit submission\n\
         7. All boilerplate fields auto-filled (e.g., applicant_name, installation_company, contractor_license)"
    );

    Task {
        description,
        expected_output,
        agent: permitting_agent(),
        plan: vec![
            ToolCall::new(CLASSIFY_JURISDICTION).arg("address", address),
            ToolCall::new(GENERATE_PERMIT_FORM)
                .arg("address", address)
                .previous_output("jurisdiction_data")
                .arg("system_details", details),
        ],
    }
}

/// Survey the regulatory news climate for a location.
pub fn research_task(location: &str) -> Task {
    let description = format!(
        "Research solar development feasibility for a specific site in {location}.\n\
         \n\
         Use the Site Impact News Research Tool with location parameter \"{location}\" to:\n\
         1. Search for recent solar development moratoriums in the area\n\
         2. Identify area-specific solar and renewable energy restrictions\n\
         3. Find headlines affecting solar project development\n\
         4. Research solar incentives and net metering policies\n\
         5. Check for utility interconnection issues or solar permitting delays\n\
         \n\
         Provide analysis specific to the area's solar regulatory environment."
    );

    let expected_output = format!(
        "Solar site feasibility analysis including:\n\
         1. Solar regulatory environment assessment\n\
         2. Local solar moratoriums or restrictions identified\n\
         3. Solar incentives and policies found\n\
         4. Environmental factors affecting solar development\n\
         5. Risk assessment for solar projects in {location}"
    );

    Task {
        description,
        expected_output,
        agent: research_agent(),
        plan: vec![ToolCall::new(SITE_IMPACT_RESEARCH).arg("location", location)],
    }
}
