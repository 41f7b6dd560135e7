//! A miniature Bioconductor website served by wiremock.
//!
//! The release channel lists five software packages:
//! - `BiocCheck` builds cleanly, has download statistics and a GitHub bug tracker
//! - `S4Vectors` has check warnings, linked from its card, and a GitLab bug tracker
//! - `Broken` failed before building, with the reason in its card
//! - `Slow` timed out, with the log link only on its own report page
//! - `org.Hs.eg.db` is annotation data, which has no build report
//!
//! Nothing is served for the devel channel.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LONG_REPORT_PATH: &str = "/checkResults/release/bioc-LATEST/";

const SOFTWARE_MANIFEST: &str = "Package: BiocCheck\nVersion: 1.41.0\n\n\
    Package: Broken\nVersion: 2.0.0\n\n\
    Package: S4Vectors\nVersion: 0.43.1\n\n\
    Package: Slow\nVersion: 1.0.0\n";

const ANNOTATION_MANIFEST: &str = "Package: org.Hs.eg.db\nVersion: 3.19.1\n";

const LONG_REPORT: &str = r#"<!DOCTYPE html>
<html><body>
<table>
<tr class="gcard compact ok"><td><b><a href="BiocCheck/index.html">BiocCheck</a>&nbsp;1.41.0</b><br>Marcel Ramos</td></tr>
<tr class="gcard compact warnings"><td><b><a href="S4Vectors/index.html">S4Vectors</a>&nbsp;0.43.1</b><br>Maintainer: Hervé Pagès</td>
  <td class="node"><a href="S4Vectors/nebbiolo2-checksrc.html"><span class="WARNINGS">WARNINGS</span></a></td></tr>
<tr class="gcard error"><td><b><a href="Broken/index.html">Broken</a>&nbsp;2.0.0</b><br>Jane Doe</td>
  <td><span class="ERROR">ERROR (missing dependency: S4Vectors)</span></td></tr>
<tr class="gcard timeout"><td><b><a href="Slow/index.html">Slow</a>&nbsp;1.0.0</b><br>John Roe</td></tr>
</table>
</body></html>"#;

const S4VECTORS_CHECK_LOG: &str = "<html><body><pre>* using R version 4.4.0\n\
    * checking Rd files ... WARNING\nprepare_Rd: bad section\n\
    * checking examples ... OK\n\
    * DONE\nStatus: 1 WARNING</pre></body></html>";

const SLOW_REPORT_PAGE: &str = r#"<html><body><table><tr>
    <td><a class="TIMEOUT" href="merida1-checksrc.html">TIMEOUT</a></td>
    </tr></table></body></html>"#;

const SLOW_CHECK_LOG: &str = "<html><body><pre>* checking tests ... TIMEOUT\nR CMD check exceeded 40 minutes\n</pre></body></html>";

const BIOCCHECK_STATS: &str = "Year\tMonth\tNb_of_distinct_IPs\tNb_of_downloads\n\
    2023\tJan\t600\t1500\n\
    2023\tFeb\t700\t2000\n\
    2023\tall\t1300\t3500\n";

const BIOCCHECK_DESCRIPTION: &str = r#"<html><body><table class="details">
    <tr><td>License</td><td>Artistic-2.0</td></tr>
    <tr><td>BugReports</td><td><a href="https://github.com/Bioconductor/BiocCheck/issues">https://github.com/Bioconductor/BiocCheck/issues</a></td></tr>
    </table></body></html>"#;

const S4VECTORS_DESCRIPTION: &str = r"<html><body><table>
    <tr><td>BugReports</td><td>https://gitlab.com/bioc/S4Vectors/issues</td></tr>
    </table></body></html>";

const BIOCCHECK_ISSUES: &str = r#"[
    {
        "number": 42,
        "title": "Crash on empty vignette",
        "html_url": "https://github.com/Bioconductor/BiocCheck/issues/42",
        "labels": [{"name": "bug"}],
        "assignee": null,
        "assignees": []
    },
    {
        "number": 43,
        "title": "Add a new check",
        "html_url": "https://github.com/Bioconductor/BiocCheck/pull/43",
        "labels": [],
        "assignee": {"login": "someone"},
        "assignees": [{"login": "someone"}],
        "pull_request": {"url": "https://api.github.com/repos/Bioconductor/BiocCheck/pulls/43"}
    }
]"#;

async fn serve(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mount every page of the miniature site, except the long report, which each test
/// mounts itself through [`mount_long_report`].
pub async fn mount_site(server: &MockServer) {
    serve(server, "/packages/release/bioc/src/contrib/PACKAGES", SOFTWARE_MANIFEST).await;
    serve(server, "/packages/release/workflows/src/contrib/PACKAGES", "").await;
    serve(server, "/packages/release/data/experiment/src/contrib/PACKAGES", "").await;
    serve(server, "/packages/release/data/annotation/src/contrib/PACKAGES", ANNOTATION_MANIFEST).await;

    serve(server, "/checkResults/release/bioc-LATEST/S4Vectors/nebbiolo2-checksrc.html", S4VECTORS_CHECK_LOG).await;
    serve(server, "/checkResults/release/bioc-LATEST/Slow/", SLOW_REPORT_PAGE).await;
    serve(server, "/checkResults/release/bioc-LATEST/Slow/merida1-checksrc.html", SLOW_CHECK_LOG).await;

    serve(server, "/packages/stats/bioc/BiocCheck/BiocCheck_stats.tab", BIOCCHECK_STATS).await;

    serve(server, "/packages/release/bioc/html/BiocCheck.html", BIOCCHECK_DESCRIPTION).await;
    serve(server, "/packages/release/bioc/html/S4Vectors.html", S4VECTORS_DESCRIPTION).await;
    serve(server, "/repos/Bioconductor/BiocCheck/issues", BIOCCHECK_ISSUES).await;
}

/// Serve the release long report, expecting it to be requested `times` times.
pub async fn mount_long_report(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path(LONG_REPORT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(LONG_REPORT))
        .expect(times)
        .mount(server)
        .await;
}
