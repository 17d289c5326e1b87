//! Embedded static UI
//!
//! The launcher page is small enough to embed in the binary; no disk
//! layout or CDN to manage.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

pub fn index() -> Response {
    serve_embedded(INDEX_HTML, "text/html; charset=utf-8")
}

pub fn app_js() -> Response {
    serve_embedded(APP_JS, "application/javascript")
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "File not found").into_response()
}

fn serve_embedded(content: &'static str, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        content,
    )
        .into_response()
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>SentryBox Launcher</title>
<style>
  body { font-family: system-ui, sans-serif; background: #1e293b; color: #e2e8f0;
         max-width: 560px; margin: 2rem auto; padding: 0 1rem; }
  h1 { font-size: 1.3rem; color: #38bdf8; }
  button { background: #0078d4; color: white; border: none; border-radius: 6px;
           padding: 0.5rem 0.9rem; margin: 0.2rem; cursor: pointer; }
  button:hover { background: #0a84e8; }
  input { background: #0f172a; color: #e2e8f0; border: 1px solid #334155;
          border-radius: 6px; padding: 0.45rem; }
  #status-box { background: #0f172a; border-radius: 8px; padding: 0.8rem;
                height: 260px; overflow-y: auto; font-family: monospace;
                font-size: 0.85rem; margin-top: 1rem; }
  .ok { color: #34d399; } .err { color: #f87171; }
  .warn { color: #fbbf24; } .info { color: #7dd3fc; }
</style>
</head>
<body>
<h1>SentryBox &mdash; Security Monitor Appliance</h1>

<div>
  <button onclick="checkSystem()">Check System</button>
  <button onclick="installAppliance()">Install Appliance</button>
  <button onclick="startVm()">Start</button>
  <button onclick="stopVm()">Stop</button>
  <button onclick="fetchIp()">Get IP</button>
  <button onclick="fetchCredentials()">Credentials</button>
</div>
<div style="margin-top:0.5rem">
  <input id="os_input" placeholder="Your OS (optional hint)">
  <button onclick="installHypervisor()">Install VirtualBox</button>
</div>

<div id="status-box"><div class="info">&gt; System initialized...</div></div>

<script src="/app.js"></script>
</body>
</html>
"#;

const APP_JS: &str = r#"function setStatus(msg, type = 'info') {
    const box = document.getElementById('status-box');
    const line = document.createElement('div');
    line.className = type;
    const prefix = { ok: '✔', err: '✖', warn: '⚠', info: '>' }[type] || '>';
    line.textContent = prefix + ' ' + msg;
    box.appendChild(line);
    box.scrollTop = box.scrollHeight;
}

function classFor(status) {
    if (status === 'success') return 'ok';
    if (status === 'error') return 'err';
    return 'warn';
}

async function call(path, opts) {
    const res = await fetch(path, opts);
    return res.json();
}

async function checkSystem() {
    setStatus('Checking system...', 'warn');
    try {
        const r = await call('/api/system');
        setStatus(r.message, classFor(r.status));
        const s = await call('/api/vm/status');
        setStatus(`VM exists: ${s.exists}, running: ${s.running}, logged in: ${s.logged_in}`);
    } catch (e) {
        setStatus('Error: backend unreachable', 'err');
    }
}

async function installHypervisor() {
    const hint = document.getElementById('os_input').value || null;
    setStatus('Downloading and installing VirtualBox (this can take a while)...', 'warn');
    try {
        const r = await call('/api/hypervisor/install', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ os: hint }),
        });
        setStatus(r.message, classFor(r.status));
    } catch (e) {
        setStatus('VirtualBox installation failed', 'err');
    }
}

async function installAppliance() {
    if (!confirm('Import the appliance? This can take 5-10 minutes.')) return;
    setStatus('Importing appliance, do not close this window...', 'warn');
    try {
        const r = await call('/api/vm/import', { method: 'POST' });
        setStatus(r.message, classFor(r.status));
    } catch (e) {
        setStatus('Appliance import failed', 'err');
    }
}

async function startVm() {
    setStatus('Starting VM...', 'warn');
    try {
        const r = await call('/api/vm/start', { method: 'POST' });
        setStatus(r.message, classFor(r.status));
    } catch (e) {
        setStatus('Start failed', 'err');
    }
}

async function stopVm() {
    if (!confirm('Shut down the monitoring VM?')) return;
    try {
        const r = await call('/api/vm/stop', { method: 'POST' });
        setStatus(r.message, classFor(r.status));
    } catch (e) {
        setStatus('Stop failed', 'err');
    }
}

async function fetchIp() {
    setStatus('Resolving guest IP...', 'warn');
    try {
        const r = await call('/api/vm/ip');
        if (r.status === 'success') {
            setStatus(`Guest IP: ${r.ip} (dashboard at https://${r.ip})`, 'ok');
        } else {
            setStatus(r.message, classFor(r.status));
        }
    } catch (e) {
        setStatus('IP lookup failed', 'err');
    }
}

async function fetchCredentials() {
    try {
        const c = await call('/api/credentials');
        setStatus(`VM login: ${c.vm_user} / ${c.vm_password}`);
        setStatus(`Dashboard: ${c.dashboard_user} / ${c.dashboard_password}`);
    } catch (e) {
        setStatus('Could not fetch credentials', 'err');
    }
}
"#;
