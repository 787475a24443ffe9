//! End-to-end import pipeline behavior against a mock management API.

use std::fs;
use std::path::Path;

use apim_cli::client::{ApiClient, Session};
use apim_cli::importer::{self, Capability, ImportOptions};
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG: &str = "acme";

fn session_for(server: &MockServer) -> Session {
    Session::new(ApiClient::with_base_url(server.uri()).unwrap())
}

fn options(folder: &Path) -> ImportOptions {
    ImportOptions::new(ORG, folder, 2).without_capability(Capability::QuotaWarning)
}

/// Snapshot folder with the two unconditional bundle subfolders.
fn snapshot_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("apiproxies")).unwrap();
    fs::create_dir(dir.path().join("sharedflows")).unwrap();
    dir
}

fn write_bundle(dir: &Path, kind: &str, name: &str) {
    let bundle = dir.join(kind).join(name).join("policies");
    fs::create_dir_all(&bundle).unwrap();
    fs::write(bundle.join("default.xml"), "<Policy/>").unwrap();
}

async fn mount_org(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/organizations/{ORG}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": ORG})))
        .mount(server)
        .await;
}

async fn mount_environments(server: &MockServer, envs: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/organizations/{ORG}/environments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envs))
        .mount(server)
        .await;
}

#[tokio::test]
async fn bundles_only_snapshot_touches_no_optional_entities() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!([])).await;

    let dir = snapshot_folder();
    write_bundle(dir.path(), "apiproxies", "proxyA");
    write_bundle(dir.path(), "sharedflows", "flowB");

    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/apis")))
        .and(query_param("action", "import"))
        .and(query_param("name", "proxyA"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/sharedflows")))
        .and(query_param("action", "import"))
        .and(query_param("name", "flowB"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // None of the optional org-level entities may be touched.
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/apiproducts")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/developers")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/envgroups")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap();
}

#[tokio::test]
async fn optional_org_entities_import_when_their_files_exist() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!([])).await;

    let dir = snapshot_folder();
    fs::write(
        dir.path().join("products.json"),
        r#"[{"name":"p1"},{"name":"p2"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("developers.json"),
        r#"[{"email":"dev@example.com","developerId":"id-1"}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("apps.json"),
        r#"[{"name":"app1","developerId":"id-1"}]"#,
    )
    .unwrap();
    fs::write(dir.path().join("envgroups.json"), r#"[{"name":"grp1"}]"#).unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/apiproducts")))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/developers")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/developers/dev@example.com/apps"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/envgroups")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap();
}

#[tokio::test]
async fn apps_never_import_without_developers_file() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!([])).await;

    let dir = snapshot_folder();
    fs::write(
        dir.path().join("apps.json"),
        r#"[{"name":"app1","developerId":"id-1"}]"#,
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/developers")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(format!(
            r"^/v1/organizations/{ORG}/developers/.+/apps$"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap();
}

#[tokio::test]
async fn developers_import_alone_when_apps_file_is_absent() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!([])).await;

    let dir = snapshot_folder();
    fs::write(
        dir.path().join("developers.json"),
        r#"[{"email":"dev@example.com","developerId":"id-1"}]"#,
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/developers")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(format!(
            r"^/v1/organizations/{ORG}/developers/.+/apps$"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap();
}

#[tokio::test]
async fn remote_environment_list_drives_per_environment_passes() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!(["test", "prod"])).await;

    let dir = snapshot_folder();
    fs::write(dir.path().join("testkvms.json"), r#"["k1"]"#).unwrap();
    fs::write(dir.path().join("prodkvms.json"), r#"["k2"]"#).unwrap();
    // A stray file for an environment the API does not report.
    fs::write(dir.path().join("stagingkvms.json"), r#"["k3"]"#).unwrap();

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/test/keyvaluemaps"
        )))
        .and(body_json(serde_json::json!({"name": "k1", "encrypted": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/prod/keyvaluemaps"
        )))
        .and(body_json(serde_json::json!({"name": "k2", "encrypted": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/staging/keyvaluemaps"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap();
}

#[tokio::test]
async fn keystore_failure_aborts_remaining_names() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!(["e1"])).await;

    let dir = snapshot_folder();
    fs::write(dir.path().join("e1keystores.json"), r#"["k1","k2","k3"]"#).unwrap();

    let keystores = format!("/v1/organizations/{ORG}/environments/e1/keystores");
    Mock::given(method("POST"))
        .and(path(keystores.clone()))
        .and(body_json(serde_json::json!({"name": "k1"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(keystores.clone()))
        .and(body_json(serde_json::json!({"name": "k2"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(keystores))
        .and(body_json(serde_json::json!({"name": "k3"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    let err = importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("k2"), "unexpected error: {err:#}");
}

#[tokio::test]
async fn single_environment_keystores_only() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!(["e1"])).await;

    let dir = snapshot_folder();
    fs::write(dir.path().join("e1keystores.json"), r#"["ks1"]"#).unwrap();

    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/keystores"
        )))
        .and(body_json(serde_json::json!({"name": "ks1"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/targetservers"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/keyvaluemaps"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/debugmask"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/traceConfig"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Debug/trace capabilities are on; only the missing files keep them out.
    let opts = options(dir.path())
        .with_capability(Capability::DebugMask)
        .with_capability(Capability::TraceConfig);
    let mut session = session_for(&server);
    importer::run(&mut session, &opts).await.unwrap();
}

#[tokio::test]
async fn debugmask_and_trace_require_their_capability() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!(["e1"])).await;

    let dir = snapshot_folder();
    fs::write(dir.path().join("e1-debugmask.json"), r#"{"namespaces":[]}"#).unwrap();
    fs::write(dir.path().join("e1-tracecfg.json"), r#"{"exporter":"JAEGER"}"#).unwrap();

    Mock::given(method("PUT"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/debugmask"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/traceConfig"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap();
}

#[tokio::test]
async fn debugmask_and_trace_import_with_capability_and_file() {
    let server = MockServer::start().await;
    mount_org(&server).await;
    mount_environments(&server, serde_json::json!(["e1"])).await;

    let dir = snapshot_folder();
    fs::write(dir.path().join("e1-debugmask.json"), r#"{"namespaces":[]}"#).unwrap();
    fs::write(dir.path().join("e1-tracecfg.json"), r#"{"exporter":"JAEGER"}"#).unwrap();

    Mock::given(method("PUT"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/debugmask"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!(
            "/v1/organizations/{ORG}/environments/e1/traceConfig"
        )))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let opts = options(dir.path())
        .with_capability(Capability::DebugMask)
        .with_capability(Capability::TraceConfig);
    let mut session = session_for(&server);
    importer::run(&mut session, &opts).await.unwrap();
}

#[tokio::test]
async fn unknown_organization_fails_before_any_import() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/organizations/{ORG}")))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such org"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/v1/organizations/{ORG}/apis")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = snapshot_folder();
    write_bundle(dir.path(), "apiproxies", "proxyA");

    let mut session = session_for(&server);
    let err = importer::run(&mut session, &options(dir.path()))
        .await
        .unwrap_err();
    assert!(
        format!("{err:#}").contains(ORG),
        "unexpected error: {err:#}"
    );
}
