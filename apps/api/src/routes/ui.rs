use axum::response::Html;

/// GET /
/// Single-page upload form. Posts the PDF to the portfolio endpoint and offers the zip.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>AI Automated Portfolio Builder</title>
<style>
body {
    margin: 0;
    min-height: 100vh;
    background: linear-gradient(135deg, #1e293b, #0f172a);
    font-family: system-ui, sans-serif;
    color: white;
}
main { max-width: 720px; margin: 0 auto; padding: 30px; }
.title { text-align: center; font-size: 40px; font-weight: 800; }
.subtitle { text-align: center; color: #cbd5f5; margin-bottom: 30px; }
form { display: flex; flex-direction: column; gap: 16px; }
input[type=file] { background: white; color: black; padding: 12px; border-radius: 8px; }
button, .download {
    background-color: #38bdf8;
    color: black;
    font-size: 18px;
    padding: 10px 24px;
    border: none;
    border-radius: 10px;
    font-weight: bold;
    cursor: pointer;
    text-align: center;
    text-decoration: none;
}
button:disabled { opacity: 0.6; cursor: wait; }
.download { background-color: #22c55e; display: none; margin-top: 16px; }
.status { margin-top: 16px; padding: 12px; border-radius: 8px; display: none; }
.status.info { display: block; background: #1e3a8a; }
.status.success { display: block; background: #166534; }
.status.warning { display: block; background: #854d0e; }
.status.error { display: block; background: #991b1b; }
</style>
</head>
<body>
<main>
<div class="title">AI Automated Portfolio Builder</div>
<div class="subtitle">Upload a resume, AI will build a portfolio site</div>
<form id="upload">
    <label for="resume">Upload your resume (PDF)</label>
    <input id="resume" name="resume" type="file" accept="application/pdf,.pdf">
    <button id="generate" type="submit">Generate Portfolio Website</button>
</form>
<div id="status" class="status"></div>
<a id="download" class="download" download="portfolio_website.zip">Download Portfolio ZIP</a>
</main>
<script>
const form = document.getElementById("upload");
const button = document.getElementById("generate");
const statusBox = document.getElementById("status");
const download = document.getElementById("download");

function show(kind, text) {
    statusBox.className = "status " + kind;
    statusBox.textContent = text;
}

form.addEventListener("submit", async (event) => {
    event.preventDefault();
    download.style.display = "none";
    const file = document.getElementById("resume").files[0];
    if (!file) {
        show("warning", "Please upload a PDF resume.");
        return;
    }

    const body = new FormData();
    body.append("resume", file);
    button.disabled = true;
    show("info", "Creating your portfolio using AI...");

    try {
        const response = await fetch("/api/v1/portfolio", { method: "POST", body });
        if (!response.ok) {
            let message = "Request failed with status " + response.status;
            try {
                const payload = await response.json();
                message = payload.error.message;
            } catch (_) {}
            show(response.status === 400 ? "warning" : "error", message);
            return;
        }
        const blob = await response.blob();
        if (download.href) URL.revokeObjectURL(download.href);
        download.href = URL.createObjectURL(blob);
        download.style.display = "block";
        show("success", "Portfolio website generated successfully!");
    } catch (err) {
        show("error", "Could not reach the server: " + err);
    } finally {
        button.disabled = false;
    }
});
</script>
</body>
</html>
"#;
