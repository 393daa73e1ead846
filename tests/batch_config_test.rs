use httpmock::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use venue_contracts::domain::ports::ConfigProvider;
use venue_contracts::utils::validation::Validate;
use venue_contracts::{generator_from_config, Normalizer, Submission, TomlConfig};

fn demo_path(name: &str) -> String {
    format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn config_for(server: &MockServer, output: &TempDir) -> anyhow::Result<TomlConfig> {
    let content = format!(
        r#"
[service]
name = "batch-test"

[template]
path = "{}/templates/contract-template.html"
vocabulary_version = 1

[render]
endpoint = "{}"
timeout_seconds = 10

[render.layout]
page_size = "Legal"
margin = "15mm"

[storage]
output_dir = "{}"
public_prefix = "/files/contracts/"
"#,
        env!("CARGO_MANIFEST_DIR"),
        server.base_url(),
        output.path().display()
    );

    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(TomlConfig::from_file(file.path())?)
}

#[tokio::test]
async fn test_csv_batch_through_toml_config() -> anyhow::Result<()> {
    let output = TempDir::new()?;
    let server = MockServer::start();
    let open = server.mock(|when, then| {
        when.method(POST).path("/sessions");
        then.status(201).json_body(serde_json::json!({"session_id": "batch"}));
    });
    server.mock(|when, then| {
        when.method(PUT).path("/sessions/batch/content");
        then.status(204);
    });
    let pdf = server.mock(|when, then| {
        when.method(POST)
            .path("/sessions/batch/pdf")
            .json_body_partial(r#"{"page_size": "Legal", "margins": {"top": "15mm"}}"#);
        then.status(200).body("%PDF-1.7 batch");
    });
    let close = server.mock(|when, then| {
        when.method(DELETE).path("/sessions/batch");
        then.status(204);
    });

    let config = config_for(&server, &output)?;
    config.validate()?;
    assert_eq!(config.public_prefix(), "/files/contracts/");

    let submissions = Submission::from_csv_reader(std::fs::File::open(demo_path("bookings.csv"))?)?;
    assert_eq!(submissions.len(), 2);

    let generator = generator_from_config(&config, true);
    for submission in &submissions {
        let response = generator.respond(submission).await;
        assert!(response.success, "row failed: {:?}", response.error);
        let path = response.file_path.unwrap_or_default();
        assert!(path.starts_with("/files/contracts/contract_"), "unexpected path {}", path);
        assert_eq!(response.payload_bytes, Some("%PDF-1.7 batch".len()));
    }

    open.assert_hits(2);
    pdf.assert_hits(2);
    close.assert_hits(2);
    assert_eq!(std::fs::read_dir(output.path())?.count(), 2);
    assert!(generator.monitor().is_enabled());

    // 監控資料只屬於單次請求，不會累積前面幾列的階段
    let contract = generator.generate(&submissions[0]).await?;
    assert_eq!(contract.phases.len(), 4);
    Ok(())
}

#[test]
fn test_demo_submissions_normalize() -> anyhow::Result<()> {
    let normalizer = Normalizer::new();

    let json = std::fs::read_to_string(demo_path("booking.json"))?;
    let record = normalizer.normalize(&Submission::from_json_str(&json)?)?;
    assert_eq!(record.client().name, "Juan Dela Cruz");
    assert_eq!(record.day().time_range().as_deref(), Some("09:00 - 17:00"));
    assert!(record.supplier("photobooth").map(|s| s.checked).unwrap_or(false));

    let rows = Submission::from_csv_reader(std::fs::File::open(demo_path("bookings.csv"))?)?;
    let second = normalizer.normalize(&rows[1])?;
    assert_eq!(second.event().name, "A & B (VIP)");
    assert!(!second.night().is_enabled());
    assert_eq!(second.venue_total().as_str(), "5000");
    Ok(())
}

#[test]
fn test_csv_row_with_bad_time_is_rejected() -> anyhow::Result<()> {
    let csv = "client_name,client_address,client_contact,resort_type,is_day,day_start_time,day_end_time,event_name,event_date,venue_total\n\
               Ana,Manila,0917,VP1,on,9am,17:00,Party,2026-10-31,1000\n";
    let rows = Submission::from_csv_reader(csv.as_bytes())?;

    let err = Normalizer::new().normalize(&rows[0]).unwrap_err();
    assert_eq!(err.kind(), "MalformedRequest");
    assert!(err.to_string().contains("day_start_time"));
    Ok(())
}
