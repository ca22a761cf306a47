use crate::errors::ServerError;
use crate::router::{handle, AppState};
use crate::scraper::parse::fixtures::detail_page;
use crate::tests::utils::{body_bytes, header, seed_data_dir, test_config, FakeFetcher};
use astra::{Body, Request};
use std::fs;
use std::io::Cursor;
use zip::ZipArchive;

const OAK_URL: &str = "https%3A%2F%2Fwoods.test%2Fbuy%2Foak-wood";

fn get(uri: &str) -> Request {
    http::Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn state_with(fetcher: FakeFetcher) -> (tempfile::TempDir, AppState) {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());
    let state = AppState::new(test_config(dir.path()), Box::new(fetcher));
    (dir, state)
}

#[test]
fn local_brochure_is_served_as_pdf() {
    let (dir, state) = state_with(FakeFetcher::new());
    fs::create_dir_all(dir.path().join("PDFs")).unwrap();
    fs::write(dir.path().join("PDFs").join("oak-wood.pdf"), b"%PDF-oak").unwrap();

    let resp = handle(get(&format!("/brochure?url={OAK_URL}")), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "application/pdf");
    assert_eq!(
        header(&resp, "Content-Disposition"),
        "attachment; filename=\"oak-wood.pdf\""
    );
    assert_eq!(body_bytes(resp), b"%PDF-oak");
}

#[test]
fn missing_brochure_is_fetched_from_the_detail_page() {
    let fetcher = FakeFetcher::new()
        .page(
            "https://woods.test/buy/oak-wood",
            detail_page("Oak Wood", "£40,000", "3 acres", "", "/media/oak-details.pdf"),
        )
        .bytes("https://woods.test/media/oak-details.pdf", b"%PDF-fetched");
    let (dir, state) = state_with(fetcher);

    let resp = handle(get(&format!("/brochure?url={OAK_URL}")), &state).unwrap();

    assert_eq!(body_bytes(resp), b"%PDF-fetched");
    assert!(dir.path().join("PDFs").join("oak-details.pdf").exists());
}

#[test]
fn brochure_needs_a_known_listing() {
    let (_dir, state) = state_with(FakeFetcher::new());

    let err = handle(get("/brochure"), &state).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = handle(get("/brochure?url=https%3A%2F%2Felsewhere.test%2Fx"), &state).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn unreachable_brochure_is_a_bad_gateway() {
    let (_dir, state) = state_with(FakeFetcher::new());

    let err = handle(get(&format!("/brochure?url={OAK_URL}")), &state).unwrap_err();
    assert_eq!(err.status(), 502);
}

#[test]
fn bulk_download_zips_what_it_finds() {
    let (dir, state) = state_with(FakeFetcher::new());
    fs::create_dir_all(dir.path().join("PDFs")).unwrap();
    fs::write(dir.path().join("PDFs").join("oak-wood.pdf"), b"%PDF-oak").unwrap();

    let resp = handle(get("/brochures.zip?n=5"), &state).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "application/zip");
    let disposition = header(&resp, "Content-Disposition").to_string();
    assert!(disposition.starts_with("attachment; filename=\"woodland_pdfs_"));
    assert!(disposition.ends_with(".zip\""));

    let archive = ZipArchive::new(Cursor::new(body_bytes(resp))).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, ["oak-wood.pdf"]);
}

#[test]
fn bulk_download_respects_filters() {
    let (dir, state) = state_with(FakeFetcher::new());
    fs::create_dir_all(dir.path().join("PDFs")).unwrap();
    fs::write(dir.path().join("PDFs").join("oak-wood.pdf"), b"%PDF-oak").unwrap();

    let err = handle(get("/brochures.zip?n=5&type=Leasehold"), &state).unwrap_err();
    assert!(matches!(err, ServerError::Brochure(_)));
    assert_eq!(err.status(), 404);
}

#[test]
fn bulk_count_must_be_positive() {
    let (_dir, state) = state_with(FakeFetcher::new());

    for uri in ["/brochures.zip?n=0", "/brochures.zip?n=many"] {
        let err = handle(get(uri), &state).unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)), "{uri}");
    }
}
