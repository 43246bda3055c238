use super::*;
use crate::har::{HarReader, parse_timestamp};
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;

const PAGE_ID: &str = "page_3";

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn humanssuck() -> Har {
    HarReader::from_file(&fixture_path("humanssuck.har")).unwrap()
}

fn page() -> HarPage {
    HarPage::builder(PAGE_ID).with_har(&humanssuck()).build().unwrap()
}

fn entry(pageref: &str, url: &str, started: &str, time: f64, content_type: Option<&str>) -> serde_json::Value {
    let headers = match content_type {
        Some(value) => json!([{"name": "Content-Type", "value": value}]),
        None => json!([]),
    };
    json!({
        "pageref": pageref,
        "startedDateTime": started,
        "time": time,
        "request": {"method": "GET", "url": url},
        "response": {"status": 200, "headers": headers, "content": {"size": 10, "mimeType": ""}}
    })
}

fn har_with(title: &str, entries: Vec<serde_json::Value>) -> Har {
    HarReader::from_value(json!({
        "log": {
            "version": "1.2",
            "creator": {"name": "test", "version": "1.0"},
            "pages": [{"id": "page_1", "title": title, "startedDateTime": "2015-01-01T12:00:00.000Z"}],
            "entries": entries
        }
    }))
    .unwrap()
}

fn mixed_assets() -> HarPage {
    let t = "2015-01-01T12:00:00.000Z";
    let har = har_with(
        "http://mixed.example/",
        vec![
            entry("page_1", "http://mixed.example/", t, 10.0, Some("text/html")),
            entry("page_1", "http://mixed.example/a.png", t, 10.0, Some("image/png")),
            entry("page_1", "http://mixed.example/a.css", t, 10.0, Some("text/css")),
            entry("page_1", "http://mixed.example/a.js", t, 10.0, Some("text/javascript")),
            entry("page_1", "http://mixed.example/a.mp3", t, 10.0, Some("audio/mpeg")),
            entry("page_1", "http://mixed.example/a.mp4", t, 10.0, Some("video/mp4")),
            entry("page_1", "http://mixed.example/a.swf", t, 10.0, Some("application/x-shockwave-flash")),
            entry("page_1", "http://mixed.example/api", t, 10.0, Some("application/json")),
            entry("page_1", "http://mixed.example/empty", t, 10.0, None),
            entry("page_1", "http://mixed.example/b.txt", t, 10.0, Some("text/plain")),
        ],
    );
    HarPage::from_har("page_1", &har).unwrap()
}

fn urls(entries: &[&Entry]) -> Vec<String> {
    entries.iter().map(|e| e.request.url.clone()).collect()
}

#[test]
fn test_build_requires_a_source() {
    let result = HarPage::builder(PAGE_ID).build();
    assert!(matches!(result, Err(Error::MissingSource)));
}

#[test]
fn test_build_from_har_or_parser() {
    let har = humanssuck();
    let from_har = HarPage::builder(PAGE_ID).with_har(&har).build().unwrap();

    let parser = HarParser::new(har.clone());
    let from_parser = HarPage::builder(PAGE_ID).with_parser(&parser).build().unwrap();

    assert_eq!(from_har.entries().len(), 4);
    assert_eq!(
        urls(&from_har.entries().iter().collect::<Vec<_>>()),
        urls(&from_parser.entries().iter().collect::<Vec<_>>())
    );
}

#[test]
fn test_unknown_page_id_is_rejected() {
    let result = HarPage::from_har("page_9", &humanssuck());
    assert!(matches!(result, Err(Error::PageNotFound(id)) if id == "page_9"));
}

#[test]
fn test_entries_are_time_ordered_and_owned_by_page() {
    let page = page();

    let starts: Vec<_> = page
        .entries()
        .iter()
        .map(|e| parse_timestamp(&e.started_date_time).unwrap())
        .collect();
    assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));

    for entry in page.entries() {
        assert_eq!(entry.page_ref.as_deref(), Some(page.page_id()));
    }

    assert_eq!(
        urls(&page.entries().iter().collect::<Vec<_>>()),
        vec![
            "http://humanssuck.net/",
            "http://humanssuck.net/jquery.min.js",
            "http://humanssuck.net/humans.png",
            "http://humanssuck.net/style.css",
        ]
    );
}

#[test]
fn test_equal_start_times_keep_document_order() {
    let t = "2015-01-01T12:00:00.000Z";
    let har = har_with(
        "http://tie.example/",
        vec![
            entry("page_1", "http://tie.example/late", "2015-01-01T12:00:01.000Z", 1.0, None),
            entry("page_1", "http://tie.example/first", t, 1.0, None),
            // same instant written with a different offset
            entry("page_1", "http://tie.example/second", "2015-01-01T07:00:00.000-05:00", 1.0, None),
            entry("page_1", "http://tie.example/third", t, 1.0, None),
        ],
    );
    let page = HarPage::from_har("page_1", &har).unwrap();

    assert_eq!(
        urls(&page.entries().iter().collect::<Vec<_>>()),
        vec![
            "http://tie.example/first",
            "http://tie.example/second",
            "http://tie.example/third",
            "http://tie.example/late",
        ]
    );
}

#[test]
fn test_naive_timestamp_fails_construction() {
    let har = har_with(
        "http://naive.example/",
        vec![entry("page_1", "http://naive.example/", "2015-01-01T12:00:00.000", 1.0, None)],
    );
    assert!(matches!(
        HarPage::from_har("page_1", &har),
        Err(Error::Timestamp { .. })
    ));
}

#[test]
fn test_page_without_entries_is_valid() {
    let page = HarPage::from_har("page_1", &har_with("http://empty.example/", vec![])).unwrap();

    assert!(page.entries().is_empty());
    assert_eq!(page.total_page_size(), 0);
    assert_eq!(page.total_load_time().unwrap(), 0.0);
    assert!(matches!(
        page.actual_page(),
        Err(Error::MissingPrimaryEntry { .. })
    ));
}

#[test]
fn test_filter_entries() {
    let page = page();

    let entries = page.filter_entries(&EntryFilter::new().with_request_type(".*ET").unwrap());
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.request.method == "GET"));

    let filter = EntryFilter::from_patterns(Some(".*ET"), Some("image.*"), None).unwrap();
    let entries = page.filter_entries(&filter);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content_type(), Some("image/png"));

    let filter = EntryFilter::from_patterns(Some(".*ET"), Some("image.*"), Some("2.*")).unwrap();
    assert_eq!(page.filter_entries(&filter).len(), 1);

    let filter = EntryFilter::from_patterns(Some(".*ET"), Some("image.*"), Some("3.*")).unwrap();
    assert!(page.filter_entries(&filter).is_empty());

    let filter = EntryFilter::new().with_request_type(".*ST").unwrap();
    assert!(page.filter_entries(&filter).is_empty());

    let filter = EntryFilter::from_patterns(Some(".*ET"), Some("video.*"), None).unwrap();
    assert!(page.filter_entries(&filter).is_empty());
}

#[test]
fn test_get_load_time() {
    let page = page();
    let get = EntryFilter::new().with_request_type("GET").unwrap();

    assert_eq!(page.get_load_time(&get, TimingModel::Overlap).unwrap(), 463.0);
    assert_eq!(page.get_load_time(&get, TimingModel::Serial).unwrap(), 843.0);

    let image = EntryFilter::new().with_content_type("image.*").unwrap();
    assert_eq!(page.get_load_time(&image, TimingModel::Overlap).unwrap(), 304.0);

    let ok = EntryFilter::new().with_status_code("2.*").unwrap();
    assert_eq!(page.get_load_time(&ok, TimingModel::Overlap).unwrap(), 463.0);

    let none = EntryFilter::new().with_content_type("video").unwrap();
    assert_eq!(page.get_load_time(&none, TimingModel::Overlap).unwrap(), 0.0);
}

#[test]
fn test_request_types() {
    let page = page();
    assert_eq!(page.get_requests().len(), 4);
    assert!(page.post_requests().is_empty());
    assert_eq!(page.requests_with_method("^GET$").unwrap().len(), 4);
    assert!(page.requests_with_method("(").is_err());
}

#[test]
fn test_actual_page_and_time_to_first_byte() {
    let page = page();

    assert_eq!(page.actual_page().unwrap().request.url, "http://humanssuck.net/");
    assert_eq!(page.time_to_first_byte().unwrap(), 153.0);
    assert_eq!(page.initial_load_time().unwrap(), 153.0);
    assert_eq!(page.hostname().as_deref(), Some("humanssuck.net"));
}

#[test]
fn test_actual_page_matches_normalized_url() {
    let har = har_with(
        "http://normalized.example",
        vec![entry(
            "page_1",
            "http://normalized.example/",
            "2015-01-01T12:00:00.000Z",
            42.0,
            Some("text/html"),
        )],
    );
    let page = HarPage::from_har("page_1", &har).unwrap();

    assert_eq!(page.actual_page().unwrap().request.url, "http://normalized.example/");
    // no timing breakdown: the whole request counts
    assert_eq!(page.time_to_first_byte().unwrap(), 42.0);
}

#[test]
fn test_missing_primary_entry_is_an_error() {
    let har = har_with(
        "http://elsewhere.example/",
        vec![entry(
            "page_1",
            "http://cdn.example/lib.js",
            "2015-01-01T12:00:00.000Z",
            42.0,
            Some("application/javascript"),
        )],
    );
    let page = HarPage::from_har("page_1", &har).unwrap();

    assert!(matches!(page.page_size(), Err(Error::MissingPrimaryEntry { .. })));
    assert!(matches!(page.time_to_first_byte(), Err(Error::MissingPrimaryEntry { .. })));
    assert!(matches!(page.initial_load_time(), Err(Error::MissingPrimaryEntry { .. })));
    // aggregates that do not need the primary entry still work
    assert_eq!(page.total_js_size(), 10);
}

#[test]
fn test_sizes() {
    let page = page();

    assert_eq!(page.page_size().unwrap(), 238);
    assert_eq!(page.total_page_size(), 62204);
    assert_eq!(page.total_text_size(), 238);
    assert_eq!(page.total_css_size(), 8);
    assert_eq!(page.total_js_size(), 38367);
    assert_eq!(page.total_image_size(), 23591);
    assert_eq!(page.total_audio_size(), 0);
    assert_eq!(page.total_video_size(), 0);
    assert_eq!(page.total_misc_size(), 0);
    assert_eq!(page.total_transfer_size(), 37907);
}

#[test]
fn test_sizes_do_not_depend_on_document_order() {
    let mut har = humanssuck();
    har.log.entries.reverse();
    let reversed = HarPage::from_har(PAGE_ID, &har).unwrap();
    let original = page();

    assert_eq!(reversed.total_page_size(), original.total_page_size());
    for category in AssetCategory::ALL {
        assert_eq!(reversed.total_size(category), original.total_size(category));
    }
}

#[test]
fn test_oversized_values_do_not_panic() {
    let t = "2015-01-01T12:00:00.000Z";
    let huge = |url: &str| {
        let mut value = entry("page_1", url, t, 10.0, Some("image/png"));
        value["response"]["content"]["size"] = json!(i64::MAX);
        value["response"]["headersSize"] = json!(i64::MAX);
        value
    };
    let mut slow = entry("page_1", "http://huge.example/", t, 1e18, Some("text/html"));
    slow["response"]["content"]["size"] = json!(0);
    let har = har_with(
        "http://huge.example/",
        vec![
            slow,
            huge("http://huge.example/a.png"),
            huge("http://huge.example/b.png"),
            huge("http://huge.example/c.png"),
        ],
    );
    let page = HarPage::from_har("page_1", &har).unwrap();

    assert_eq!(page.total_page_size(), u64::MAX);
    assert_eq!(page.total_image_size(), u64::MAX);
    assert_eq!(page.total_transfer_size(), u64::MAX);
    assert!(matches!(page.total_load_time(), Err(Error::Timestamp { .. })));
    assert_eq!(page.image_load_time().unwrap(), 10.0);
}

#[test]
fn test_load_times() {
    let page = page();

    assert_eq!(page.image_load_time().unwrap(), 304.0);
    assert_eq!(page.css_load_time().unwrap(), 76.0);
    assert_eq!(page.js_load_time().unwrap(), 310.0);
    assert_eq!(page.text_load_time().unwrap(), 153.0);
    assert_eq!(page.html_load_time().unwrap(), 153.0);
    assert_eq!(page.audio_load_time().unwrap(), 0.0);
    assert_eq!(page.video_load_time().unwrap(), 0.0);

    assert_eq!(page.total_load_time().unwrap(), 463.0);
    assert_eq!(page.total_image_load_time().unwrap(), 304.0);
    assert_eq!(page.total_css_load_time().unwrap(), 76.0);
    assert_eq!(page.total_js_load_time().unwrap(), 310.0);
    assert_eq!(page.total_text_load_time().unwrap(), 153.0);
    assert_eq!(page.total_html_load_time().unwrap(), 153.0);
    assert_eq!(page.total_audio_load_time().unwrap(), 0.0);
    assert_eq!(page.total_video_load_time().unwrap(), 0.0);

    assert_eq!(page.serial_load_time(), 843.0);
    assert!(page.total_load_time().unwrap() <= page.serial_load_time());
}

#[test]
fn test_receive_phase_load_times() {
    let page = page();

    // css receives over [211, 236), js and image both over [263, 463)
    assert_eq!(page.content_load_time().unwrap(), 225.0);
    assert_eq!(page.receive_time(AssetCategory::Image).unwrap(), 200.0);
    assert_eq!(page.receive_time(AssetCategory::Css).unwrap(), 25.0);
    assert_eq!(page.receive_time(AssetCategory::Text).unwrap(), 0.0);
}

#[test]
fn test_recorded_page_timings() {
    let page = page();
    assert_eq!(page.on_content_load(), Some(543.0));
    assert_eq!(page.on_load(), Some(567.0));
    assert_eq!(page.started_date_time(), Some("2015-01-01T12:00:00.000Z"));
}

#[test]
fn test_file_types() {
    let page = mixed_assets();

    let expected = [
        (AssetCategory::Image, vec!["http://mixed.example/a.png"]),
        (AssetCategory::Css, vec!["http://mixed.example/a.css"]),
        (AssetCategory::Js, vec!["http://mixed.example/a.js"]),
        (AssetCategory::Audio, vec!["http://mixed.example/a.mp3"]),
        (
            AssetCategory::Video,
            vec!["http://mixed.example/a.mp4", "http://mixed.example/a.swf"],
        ),
        (
            AssetCategory::Text,
            vec!["http://mixed.example/", "http://mixed.example/b.txt"],
        ),
        (
            AssetCategory::Misc,
            vec!["http://mixed.example/api", "http://mixed.example/empty"],
        ),
    ];

    for (category, want) in expected {
        assert_eq!(urls(&page.files(category)), want, "category {category}");
    }

    assert_eq!(urls(&page.video_files()), urls(&page.files(AssetCategory::Video)));
    assert_eq!(urls(&page.misc_files()), urls(&page.files(AssetCategory::Misc)));
    assert_eq!(urls(&page.html_files()), vec!["http://mixed.example/"]);
}

#[test]
fn test_html_files_span_text_and_misc() {
    let t = "2015-01-01T12:00:00.000Z";
    let har = har_with(
        "http://xhtml.example/",
        vec![
            entry("page_1", "http://xhtml.example/", t, 10.0, Some("text/html")),
            entry("page_1", "http://xhtml.example/b", t, 10.0, Some("application/xhtml+xml")),
        ],
    );
    let page = HarPage::from_har("page_1", &har).unwrap();

    assert_eq!(page.html_files().len(), 2);
    assert_eq!(page.text_files().len(), 1);
    assert_eq!(page.misc_files()[0].request.url, "http://xhtml.example/b");
}

#[test]
fn test_categories_partition_the_page() {
    for page in [page(), mixed_assets()] {
        let mut seen = HashSet::new();
        let mut total = 0;
        for category in AssetCategory::ALL {
            for entry in page.files(category) {
                // pointer identity: no entry may appear in two categories
                assert!(seen.insert(entry as *const Entry));
                total += 1;
            }
        }
        assert_eq!(total, page.entries().len());
    }
}

#[test]
fn test_properties_are_idempotent() {
    let page = page();

    let first = (
        page.total_load_time().unwrap(),
        page.total_page_size(),
        urls(&page.image_files()),
        page.time_to_first_byte().unwrap(),
    );
    let second = (
        page.total_load_time().unwrap(),
        page.total_page_size(),
        urls(&page.image_files()),
        page.time_to_first_byte().unwrap(),
    );
    assert_eq!(first, second);
}

#[test]
fn test_unknown_page_collects_orphans() {
    let page = HarPage::from_har(UNKNOWN_PAGE_ID, &humanssuck()).unwrap();

    assert_eq!(page.entries().len(), 1);
    assert_eq!(page.title(), None);
    assert_eq!(page.on_load(), None);
    assert_eq!(page.total_image_size(), 43);
    assert!(matches!(
        page.actual_page(),
        Err(Error::MissingPrimaryEntry { .. })
    ));
}

#[test]
fn test_page_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HarPage>();
}
