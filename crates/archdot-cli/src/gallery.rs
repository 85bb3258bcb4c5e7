//! Built-in sample diagrams
//!
//! A gallery of diagrams describing an event-sourced CQRS backend: commands
//! are appended to an event log, a publisher fans them out onto a stream,
//! and projectors maintain the read models. The samples double as living
//! documentation of the library API and as regenerable, version-controlled
//! artifacts.

use anyhow::Result;
use archdot::{Category, Diagram, Direction, EdgeStyle};

/// One gallery entry: output file stem plus the finished diagram
pub struct GalleryEntry {
    pub name: &'static str,
    pub diagram: Diagram,
}

/// Build every gallery diagram in a stable order
pub fn all() -> Result<Vec<GalleryEntry>> {
    Ok(vec![
        GalleryEntry {
            name: "architecture",
            diagram: main_architecture()?,
        },
        GalleryEntry {
            name: "architecture_detailed",
            diagram: detailed_architecture()?,
        },
        GalleryEntry {
            name: "event_flow",
            diagram: event_flow()?,
        },
    ])
}

/// Build the gallery diagrams matching a name filter, or all of them
pub fn matching(only: Option<&str>) -> Result<Vec<GalleryEntry>> {
    let entries = all()?;
    match only {
        None => Ok(entries),
        Some(filter) => {
            let filtered: Vec<_> = entries
                .into_iter()
                .filter(|e| e.name.contains(filter))
                .collect();
            if filtered.is_empty() {
                anyhow::bail!("no gallery diagram matches \"{}\"", filter);
            }
            Ok(filtered)
        }
    }
}

/// The main write/publish/project architecture, left to right
fn main_architecture() -> Result<Diagram> {
    let mut d = Diagram::new("Event-Sourced Backend - CQRS/ES Architecture")
        .with_direction(Direction::LeftRight);

    let user = d.node("Client/User", Category::Client);

    let api_layer = d.open_cluster("API Layer");
    let gateway = d.node("API Gateway\n(HTTP API)", Category::Gateway);
    let api = d.node("API Handler\n(Commands)", Category::Function);
    d.close_cluster(api_layer)?;

    let write_model = d.open_cluster("Event Store (Write Model)");
    let event_log = d.node("Event Log\n(with Streams)", Category::Database);
    let snapshots = d.node("Event Snapshots", Category::Database);
    d.close_cluster(write_model)?;

    let publishing = d.open_cluster("Event Publishing");
    let publisher = d.node("Publisher", Category::Function);
    let stream = d.node("Event Stream\n(Event Bus)", Category::Stream);
    let publisher_dlq = d.node("Publisher DLQ", Category::Queue);
    d.close_cluster(publishing)?;

    let projectors = d.open_cluster("Read Model Projectors");
    let proj_views = d.node("Projector Views\n(Read Model)", Category::Function);
    let proj_analyzer = d.node("Projector Analyzer\n(Analysis)", Category::Function);
    let views_dlq = d.node("Views DLQ", Category::Queue);
    let analyzer_dlq = d.node("Analyzer DLQ", Category::Queue);
    d.close_cluster(projectors)?;

    let read_models = d.open_cluster("Read Model & Storage");
    let views = d.node("Materialized View", Category::Database);
    let documents = d.node("Documents\nBucket", Category::Storage);
    d.close_cluster(read_models)?;

    // main flow
    d.connect_labeled(user, gateway, "HTTP Request")?;
    d.connect_labeled(gateway, api, "Invoke")?;
    d.connect_labeled(api, event_log, "Write Events")?;
    d.connect_labeled(api, snapshots, "Store State")?;

    // publishing flow
    d.connect_labeled(event_log, publisher, "Change Stream")?;
    d.connect_labeled(publisher, stream, "Publish Events")?;
    d.connect_labeled(publisher, publisher_dlq, "Failures")?;

    // projection flows
    d.connect_labeled(stream, proj_views, "Subscribe\n(batch=10)")?;
    d.connect_labeled(stream, proj_analyzer, "Subscribe\n(batch=1)")?;
    d.connect_labeled(proj_views, views, "Update")?;
    d.connect_labeled(proj_views, views_dlq, "Failures")?;
    d.connect_labeled(proj_analyzer, event_log, "Analyze & Update")?;
    d.connect_labeled(proj_analyzer, analyzer_dlq, "Failures")?;

    // storage interactions
    d.connect_labeled(api, documents, "Upload")?;
    d.connect_labeled(documents, proj_analyzer, "Storage Trigger\n(on upload)")?;
    d.connect_labeled(proj_analyzer, documents, "Read")?;

    // read path
    d.connect_with(api, views, Some("Read Query".to_string()), EdgeStyle::Dashed)?;

    Ok(d)
}

/// The detailed variant with the security role and nested clusters, top down
fn detailed_architecture() -> Result<Diagram> {
    let mut d = Diagram::new("Event-Sourced Backend - Detailed Event Flow")
        .with_direction(Direction::TopBottom);

    let user = d.node("Client", Category::Client);

    let security = d.open_cluster("Security");
    let role = d.node("Execution Role", Category::Security);
    d.close_cluster(security)?;

    let command_side = d.open_cluster("Command Side (Write)");
    let gateway = d.node("API Gateway", Category::Gateway);
    let api = d.node("API Handler", Category::Function);
    let store = d.open_cluster("Event Store");
    let event_log = d.node("Event Log", Category::Database);
    let snapshots = d.node("Snapshots", Category::Database);
    d.close_cluster(store)?;
    d.close_cluster(command_side)?;

    let distribution = d.open_cluster("Event Distribution");
    let publisher = d.node("Publisher", Category::Function);
    let stream = d.node("Event Stream", Category::Stream);
    let dlqs = d.open_cluster("DLQs");
    let pub_dlq = d.node("Publisher DLQ", Category::Queue);
    d.close_cluster(dlqs)?;
    d.close_cluster(distribution)?;

    let query_side = d.open_cluster("Query Side (Read)");
    let projectors = d.open_cluster("Projectors");
    let proj_views = d.node("Views Projector", Category::Function);
    let proj_analyzer = d.node("Analyzer Projector", Category::Function);
    let views_dlq = d.node("Views DLQ", Category::Queue);
    let analyzer_dlq = d.node("Analyzer DLQ", Category::Queue);
    d.close_cluster(projectors)?;
    let read_models = d.open_cluster("Read Models");
    let views = d.node("Materialized View", Category::Database);
    let documents = d.node("Documents", Category::Storage);
    d.close_cluster(read_models)?;
    d.close_cluster(query_side)?;

    d.connect(user, gateway)?;
    d.connect(gateway, api)?;
    d.connect(api, role)?;
    d.connect(api, event_log)?;
    d.connect(api, snapshots)?;
    d.connect(api, documents)?;

    d.connect_labeled(event_log, publisher, "Stream")?;
    d.connect(publisher, stream)?;
    d.connect(publisher, pub_dlq)?;

    d.connect(stream, proj_views)?;
    d.connect(proj_views, views)?;
    d.connect(stream, proj_analyzer)?;
    d.connect(proj_analyzer, event_log)?;

    d.connect(proj_views, views_dlq)?;
    d.connect(proj_analyzer, analyzer_dlq)?;

    d.connect_labeled(documents, proj_analyzer, "Trigger")?;
    d.connect(proj_analyzer, documents)?;

    d.connect_with(api, views, Some("Query".to_string()), EdgeStyle::Dashed)?;

    Ok(d)
}

/// The numbered event-flow sequence, left to right
fn event_flow() -> Result<Diagram> {
    let mut d = Diagram::new("Event-Sourced Backend - Event Flow Sequence")
        .with_direction(Direction::LeftRight);

    let command = d.open_cluster("1. Command");
    let user = d.node("User", Category::Client);
    let api_gw = d.node("API", Category::Gateway);
    let api = d.node("API Handler", Category::Function);
    d.close_cluster(command)?;

    let store = d.open_cluster("2. Event Store");
    let events = d.node("Event Log", Category::Database);
    d.close_cluster(store)?;

    let publishing = d.open_cluster("3. Publishing");
    let publisher = d.node("Publisher", Category::Function);
    let stream = d.node("Stream", Category::Stream);
    d.close_cluster(publishing)?;

    let projections = d.open_cluster("4. Projections");
    let projector_views = d.node("Views", Category::Function);
    let projector_analyzer = d.node("Analyzer", Category::Function);
    d.close_cluster(projections)?;

    let read_models = d.open_cluster("5. Read Models");
    let view = d.node("View", Category::Database);
    let bucket = d.node("Bucket", Category::Storage);
    d.close_cluster(read_models)?;

    d.connect_labeled(user, api_gw, "1. POST /commands")?;
    d.connect_labeled(api_gw, api, "2. Invoke")?;
    d.connect_labeled(api, events, "3. Append Event")?;
    d.connect_labeled(events, publisher, "4. Stream")?;
    d.connect_labeled(publisher, stream, "5. Publish")?;
    d.connect_labeled(stream, projector_views, "6. Consume")?;
    d.connect_labeled(stream, projector_analyzer, "6. Consume")?;
    d.connect_labeled(projector_views, view, "7. Update")?;
    d.connect_labeled(projector_analyzer, bucket, "7. Upload")?;

    Ok(d)
}
