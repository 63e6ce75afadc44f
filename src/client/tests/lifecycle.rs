use super::*;

#[test]
fn new_rejects_invalid_config() {
    let mut config = test_config();
    config.api.base_url = "not a url".to_string();

    let err = DownloadClient::new(config).unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn with_gateway_validates_polling_interval() {
    let mut config = test_config();
    config.polling.interval = Duration::ZERO;

    let result = DownloadClient::with_gateway(config, ScriptedGateway::new());

    assert!(matches!(result, Err(Error::Config { .. })));
}

#[tokio::test]
async fn initialize_loads_services_without_polling() {
    let (client, gateway) = create_test_client();
    gateway.set_services(Ok(vec!["youtube".to_string(), "vimeo".to_string()]));
    let mut events = client.subscribe();

    client.initialize().await.unwrap();

    assert_eq!(
        client.supported_services().await,
        SupportedServices::Loaded(vec!["youtube".to_string(), "vimeo".to_string()])
    );
    assert!(!client.is_polling().await);
    assert_eq!(events.recv().await.unwrap(), Event::ServicesLoaded { count: 2 });
}

#[tokio::test]
async fn initialize_auto_starts_polling() {
    let mut config = test_config();
    config.polling.auto_start = true;
    let (client, gateway) = create_test_client_with(config);

    client.initialize().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(client.is_polling().await);
    assert_eq!(gateway.list_count(), 1, "first poll runs immediately");
    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn initialize_failure_keeps_catalog_unloaded() {
    let mut config = test_config();
    config.polling.auto_start = true;
    let (client, gateway) = create_test_client_with(config);
    gateway.set_services(Err(RemoteError::unavailable("worker down")));

    let err = client.initialize().await.unwrap_err();

    assert_eq!(err.error_code(), "unavailable");
    assert_eq!(client.supported_services().await, SupportedServices::NotLoaded);
    assert!(client.is_polling().await, "polling does not depend on the catalog");
    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn polling_can_be_stopped_and_restarted() {
    let mut config = test_config();
    config.polling.interval = Duration::from_millis(20);
    let (client, gateway) = create_test_client_with(config);

    client.start_polling().await.unwrap();
    tokio::time::sleep(Duration::from_millis(70)).await;
    assert!(client.stop_polling().await);
    let polls = gateway.list_count();
    assert!(polls >= 2, "expected repeated polls, got {polls}");

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(gateway.list_count(), polls);
    assert!(!client.stop_polling().await, "already stopped");

    client.start_polling().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(gateway.list_count() > polls);
    client.stop_polling().await;
}

#[tokio::test]
async fn shutdown_stops_polling_and_keeps_tasks() {
    let (client, gateway) = create_test_client();
    gateway.set_listing(vec![RemoteTask::new("b1").with_status(Status::Downloading)]);
    client.start_polling().await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    let mut events = client.subscribe();

    client.shutdown().await.unwrap();

    assert!(!client.is_polling().await);
    assert_eq!(client.tasks().len(), 1);
    assert_eq!(events.recv().await.unwrap(), Event::PollingStopped);
    assert_eq!(events.recv().await.unwrap(), Event::Shutdown);
}

#[tokio::test]
async fn dropping_last_client_handle_stops_polling() {
    let mut config = test_config();
    config.polling.interval = Duration::from_millis(20);
    let (client, gateway) = create_test_client_with(config);
    let clone = client.clone();

    client.start_polling().await.unwrap();
    tokio::time::sleep(Duration::from_millis(70)).await;
    drop(client);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(
        gateway.list_count() > 3,
        "a remaining handle keeps polling"
    );

    drop(clone);
    tokio::time::sleep(Duration::from_millis(20)).await;
    let dropped_at = gateway.list_count();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(gateway.list_count(), dropped_at, "no poll after the last drop");
}
