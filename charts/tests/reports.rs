//! Report shaping against real files in temporary directories.

use std::fs;
use std::path::Path;

use querychart::reports::{self, category_ctr, event_response, search_volume, stock_correlation, top_domains};
use querychart::{RenderError, ReportError, ReportId, Settings, UnmatchedPolicy};
use tempfile::TempDir;

fn settings(data: &Path, out: &Path) -> Settings {
    Settings {
        data_dir: data.to_path_buf(),
        out_dir: out.to_path_buf(),
        ..Settings::default()
    }
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

/// Small but complete inputs for all five reports.
fn seed_all(dir: &Path) {
    write(
        dir,
        search_volume::INPUT,
        "SALES_MONTH,calender week,DIGITAL_SEARCH_COUNT\n\
         march,[NULL],100\napril,[NULL],80\nmarch,1,40\nmarch,2,60\napril,5,80\n\
         [NULL],[NULL],180\n",
    );
    write(
        dir,
        category_ctr::INPUT,
        "CATEGORY,hour,weekday,CTR_PERCENTAGE,TOTAL_SEARCHES\n\
         News,[NULL],[NULL],2.5,900\nShopping,[NULL],[NULL],7.25,1200\n\
         News,3,[NULL],1.5,40\nShopping,4,[NULL],6.0,80\n\
         News,[NULL],monday,2.2,200\nShopping,[NULL],tuesday,7.0,500\n",
    );
    write(
        dir,
        top_domains::INPUT,
        "CATEGORY,THISDOMAIN,DOMAIN_CLICK_COUNT,DOMAIN_RANK_WITHIN_CATEGORY\n\
         News,cnn.com,50,1\nNews,bbc.co.uk,20,2\nHome/Garden,hgtv.com,9,1\n",
    );
    write(
        dir,
        event_response::TREND_INPUT,
        "EVENT_DATE_STRING,TOTAL_DAILY_DIGITAL_SEARCHES,UNIQUE_DAILY_DIGITAL_USERS\n\
         2006-03-01,100,10\n2006-03-02,250,22\n2006-03-03,180,15\n",
    );
    write(
        dir,
        event_response::EVENTS_INPUT,
        "EVENT_DATE,EVENT_KEYWORD,HIGH_INTENT_SEARCH_COUNT\n2006-03-02 00:00:00,world cup,55\n",
    );
    write(
        dir,
        &stock_correlation::input_name("EBAY"),
        "TICKER,DATE_KEY,CUMULATIVE_SEARCH_AVG,ADJ_CLOSE_PRICE\n\
         EBAY,2006-03-01,1.0,39.5\nEBAY,2006-03-02,1.5,40.1\nEBAY,2006-03-03,2.5,38.9\n",
    );
}

#[test]
fn test_every_report_writes_into_its_folder() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed_all(data.path());
    let s = settings(data.path(), out.path());

    let expected = [
        (ReportId::SearchVolume, 2),
        (ReportId::CategoryCtr, 3),
        // gif, two frames, small multiples
        (ReportId::TopDomains, 4),
        (ReportId::EventResponse, 1),
        (ReportId::StockCorrelation, 1),
    ];
    for (id, count) in expected {
        let outcome = reports::run(id, &s).unwrap();
        assert_eq!(outcome.report, id);
        assert_eq!(outcome.artifacts.len(), count, "{}", id);

        let folder = out.path().join(id.subdir());
        for artifact in &outcome.artifacts {
            assert!(artifact.starts_with(&folder), "{} outside {}", artifact.display(), id.subdir());
            assert!(fs::metadata(artifact).unwrap().len() > 0, "{} is empty", artifact.display());
        }
    }

    let q1 = out.path().join("question1");
    assert!(q1.join(search_volume::MONTHLY_CHART).exists());
    assert!(q1.join(search_volume::WEEKLY_CHART).exists());
    let frames = out.path().join("question3").join(top_domains::FRAME_DIR);
    assert!(frames.join("category_01_Home_Garden.png").exists());
    assert!(frames.join("category_02_News.png").exists());
    assert!(out
        .path()
        .join("question5")
        .join(stock_correlation::chart_name("EBAY"))
        .exists());
}

#[test]
fn test_domains_delete_frames_after_animation() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    seed_all(data.path());
    let mut s = settings(data.path(), out.path());
    s.delete_intermediate_files = true;

    let outcome = reports::run(ReportId::TopDomains, &s).unwrap();

    let q3 = out.path().join("question3");
    assert_eq!(
        outcome.artifacts,
        vec![q3.join(top_domains::ANIMATION), q3.join(top_domains::GRID_CHART)]
    );
    assert!(q3.join(top_domains::ANIMATION).exists());
    assert!(!q3.join(top_domains::FRAME_DIR).exists());
}

#[test]
fn test_domains_without_categories_leaves_no_frame_dir() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        data.path(),
        top_domains::INPUT,
        "CATEGORY,THISDOMAIN,DOMAIN_CLICK_COUNT,DOMAIN_RANK_WITHIN_CATEGORY\n[NULL],all.com,5,1\n",
    );

    let err = reports::run(ReportId::TopDomains, &settings(data.path(), out.path())).unwrap_err();

    assert!(matches!(err, ReportError::Render(RenderError::NoFrames(_))));
    assert!(!out.path().join("question3").join(top_domains::FRAME_DIR).exists());
}

#[test]
fn test_rollup_scenario_end_to_end() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        data.path(),
        search_volume::INPUT,
        " SALES_MONTH ,calender week , DIGITAL_SEARCH_COUNT\n\
         march,[NULL],100\n\
         march,1,40\n\
         march,2,60\n",
    );

    let views = search_volume::shape(&settings(data.path(), out.path())).unwrap();

    assert_eq!(views.monthly.len(), 1);
    assert_eq!(views.monthly.labels("SALES_MONTH").unwrap(), vec!["March"]);
    assert_eq!(views.monthly.numbers("DIGITAL_SEARCH_COUNT").unwrap(), vec![100.0]);

    assert_eq!(
        views.weekly.labels(search_volume::WEEK_LABEL).unwrap(),
        vec!["March Wk 1", "March Wk 2"]
    );
    assert_eq!(views.weekly.numbers("calender week").unwrap(), vec![1.0, 2.0]);
    assert_eq!(views.discarded, 0);
}

#[test]
fn test_shaping_is_idempotent() {
    let data = TempDir::new().unwrap();
    write(
        data.path(),
        search_volume::INPUT,
        "SALES_MONTH,calender week,DIGITAL_SEARCH_COUNT\n\
         may,[NULL],9\nmarch,[NULL],3\napril,5,1\nmarch,2,2\nmarch,1,1\n",
    );
    let s = settings(data.path(), data.path());

    let first = search_volume::shape(&s).unwrap();
    let second = search_volume::shape(&s).unwrap();
    assert_eq!(first.monthly, second.monthly);
    assert_eq!(first.weekly, second.weekly);
    assert_eq!(
        first.monthly.labels("SALES_MONTH").unwrap(),
        vec!["March", "May"]
    );
}

#[test]
fn test_missing_input_writes_nothing() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let err = reports::run(ReportId::SearchVolume, &settings(data.path(), out.path())).unwrap_err();

    assert!(matches!(err, ReportError::Load(ref e) if e.is_data_unavailable()));
    assert!(err.to_string().contains(search_volume::INPUT));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_second_input_missing_writes_nothing() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        data.path(),
        event_response::TREND_INPUT,
        "EVENT_DATE_STRING,TOTAL_DAILY_DIGITAL_SEARCHES,UNIQUE_DAILY_DIGITAL_USERS\n2006-03-01,1,1\n",
    );

    let err = reports::run(ReportId::EventResponse, &settings(data.path(), out.path())).unwrap_err();

    assert!(err.to_string().contains(event_response::EVENTS_INPUT));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_weekday_case_folding_and_skip() {
    let data = TempDir::new().unwrap();
    write(
        data.path(),
        category_ctr::INPUT,
        "CATEGORY,hour,weekday,CTR_PERCENTAGE,TOTAL_SEARCHES\n\
         News,[NULL], Tuesday,2.0,30\n\
         News,[NULL],Mon,2.0,10\n\
         News,[NULL],monday,2.0,20\n",
    );
    let mut s = settings(data.path(), data.path());

    let views = category_ctr::shape(&s).unwrap();
    assert_eq!(views.weekday.labels("weekday").unwrap(), vec!["monday", "tuesday"]);

    s.unmatched = UnmatchedPolicy::Strict;
    let err = category_ctr::shape(&s).unwrap_err();
    assert!(matches!(err, ReportError::Shape(_)));
    assert!(err.to_string().contains("'mon'"));
}

#[test]
fn test_non_numeric_value_names_line_and_column() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        data.path(),
        category_ctr::INPUT,
        "CATEGORY,hour,weekday,CTR_PERCENTAGE,TOTAL_SEARCHES\nNews,noon,[NULL],2.0,30\n",
    );

    let err = reports::run(ReportId::CategoryCtr, &settings(data.path(), out.path())).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Line 2"));
    assert!(msg.contains("hour"));
    assert!(msg.contains("noon"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_ticker_selects_input_file() {
    let data = TempDir::new().unwrap();
    write(
        data.path(),
        &stock_correlation::input_name("AAPL"),
        "TICKER,DATE_KEY,CUMULATIVE_SEARCH_AVG,ADJ_CLOSE_PRICE\n\
         AAPL,2006-03-02,2.0,61.0\nAAPL,2006-03-01,1.0,60.0\n",
    );
    let mut s = settings(data.path(), data.path());
    s.ticker = "AAPL".to_string();

    let rows = stock_correlation::shape(&s).unwrap();
    assert_eq!(rows.numbers("ADJ_CLOSE_PRICE").unwrap(), vec![60.0, 61.0]);

    s.ticker = "EBAY".to_string();
    assert!(stock_correlation::shape(&s).is_err());
}
