pub fn render_index(start_date: &str) -> String {
    INDEX_HTML.replace("{{START_DATE}}", start_date)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Rep Tracker</title>
  <style>
    :root {
      --bg: #eef3f0;
      --ink: #24312a;
      --accent: #2f8f5b;
      --accent-2: #b3552f;
      --muted: #6d7a72;
      --card: #ffffff;
      --line: rgba(36, 49, 42, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #e2ece5 70%);
      color: var(--ink);
      font-family: "Avenir Next", "Segoe UI", sans-serif;
      display: grid;
      place-items: start center;
      padding: 28px 16px 48px;
    }

    .app {
      width: min(780px, 100%);
      background: var(--card);
      border-radius: 18px;
      border: 1px solid var(--line);
      box-shadow: 0 18px 48px rgba(36, 49, 42, 0.12);
      padding: 28px;
      display: grid;
      gap: 22px;
    }

    h1 {
      margin: 0;
      font-size: 1.9rem;
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 5px;
      background: rgba(47, 143, 91, 0.1);
      border-radius: 999px;
      width: fit-content;
    }

    .tab {
      border: none;
      background: transparent;
      border-radius: 999px;
      padding: 8px 18px;
      font-size: 0.95rem;
      font-weight: 600;
      color: var(--muted);
      cursor: pointer;
    }

    .tab.active {
      background: var(--accent);
      color: white;
    }

    form.entry {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(130px, 1fr));
      gap: 12px;
      align-items: end;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.8rem;
      color: var(--muted);
    }

    input, select {
      padding: 9px 10px;
      border: 1px solid var(--line);
      border-radius: 10px;
      font-size: 0.95rem;
    }

    button.action {
      border: none;
      border-radius: 10px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.action.secondary {
      background: transparent;
      color: var(--muted);
      border: 1px solid var(--line);
    }

    button.action.danger {
      background: var(--accent-2);
    }

    .totals {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .total-card {
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 12px 14px;
      display: grid;
      gap: 4px;
    }

    .total-card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .total-card .value {
      font-size: 1.5rem;
      font-weight: 700;
    }

    #chart {
      width: 100%;
      height: 220px;
      display: block;
      border: 1px solid var(--line);
      border-radius: 12px;
      background: #fbfdfc;
    }

    .bar-sam { fill: var(--accent); }
    .bar-alex { fill: var(--accent-2); }
    .chart-label { fill: var(--muted); font-size: 11px; }

    .legend {
      display: flex;
      gap: 16px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .legend .dot {
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 999px;
      margin-right: 5px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.95rem;
    }

    th, td {
      text-align: left;
      padding: 9px 8px;
      border-bottom: 1px solid var(--line);
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    td.actions {
      text-align: right;
      white-space: nowrap;
    }

    td.actions button {
      border: none;
      background: transparent;
      color: var(--accent);
      font-weight: 600;
      cursor: pointer;
      padding: 4px 6px;
    }

    td.actions button.delete {
      color: var(--accent-2);
    }

    .footer-row {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #b23a2a;
    }

    .empty {
      color: var(--muted);
      font-style: italic;
      padding: 14px 8px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Rep Tracker</h1>
      <p class="subtitle">Daily reps for Sam and Alex, totalled and charted per day.</p>
    </header>

    <div class="tabs" role="tablist">
      <button class="tab active" type="button" data-exercise="pushups" role="tab">Pushups</button>
      <button class="tab" type="button" data-exercise="abs" role="tab">Abs</button>
    </div>

    <form class="entry" id="entry-form">
      <label>Person
        <select id="person">
          <option value="sam">Sam</option>
          <option value="alex">Alex</option>
        </select>
      </label>
      <label>Date
        <input type="date" id="date" min="{{START_DATE}}" />
      </label>
      <label>Count
        <input type="number" id="count" min="1" step="1" placeholder="20" />
      </label>
      <button class="action" id="submit-btn" type="submit">Add entry</button>
      <button class="action secondary" id="cancel-btn" type="button" hidden>Cancel edit</button>
    </form>

    <section class="totals" id="totals"></section>

    <section>
      <svg id="chart" viewBox="0 0 600 220" role="img" aria-label="Daily totals"></svg>
      <div class="legend">
        <span><span class="dot" style="background: var(--accent)"></span>Sam</span>
        <span><span class="dot" style="background: var(--accent-2)"></span>Alex</span>
      </div>
    </section>

    <section>
      <table>
        <thead>
          <tr><th>Date</th><th>Person</th><th>Count</th><th></th></tr>
        </thead>
        <tbody id="entries"></tbody>
      </table>
    </section>

    <div class="footer-row">
      <div class="status" id="status"></div>
      <button class="action danger" id="clear-btn" type="button">Clear all</button>
    </div>
  </main>

  <script>
    const START_DATE = '{{START_DATE}}';
    const HIGH_COUNT = 300;
    const PEOPLE = { sam: 'Sam', alex: 'Alex' };

    const tabs = Array.from(document.querySelectorAll('.tab'));
    const form = document.getElementById('entry-form');
    const personEl = document.getElementById('person');
    const dateEl = document.getElementById('date');
    const countEl = document.getElementById('count');
    const submitBtn = document.getElementById('submit-btn');
    const cancelBtn = document.getElementById('cancel-btn');
    const totalsEl = document.getElementById('totals');
    const entriesEl = document.getElementById('entries');
    const chartEl = document.getElementById('chart');
    const statusEl = document.getElementById('status');
    const clearBtn = document.getElementById('clear-btn');

    let exercise = 'pushups';
    let editingId = null;

    const todayIso = () => {
      const now = new Date();
      const pad = (n) => String(n).padStart(2, '0');
      return `${now.getFullYear()}-${pad(now.getMonth() + 1)}-${pad(now.getDate())}`;
    };

    const setStatus = (message, type) => {
      statusEl.textContent = message || '';
      statusEl.dataset.type = type || '';
    };

    const api = async (path, options) => {
      const res = await fetch(`/api/${exercise}${path}`, options);
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      return res.json();
    };

    const postJson = (path, body) => api(path, {
      method: 'POST',
      headers: { 'content-type': 'application/json' },
      body: JSON.stringify(body)
    });

    const renderTotals = (totals) => {
      const combined = Object.values(totals).reduce((sum, value) => sum + value, 0);
      totalsEl.innerHTML = Object.entries(PEOPLE)
        .map(([key, name]) => `
          <div class="total-card">
            <span class="label">${name}</span>
            <span class="value">${totals[key] ?? 0}</span>
          </div>`)
        .join('') + `
          <div class="total-card">
            <span class="label">Together</span>
            <span class="value">${combined}</span>
          </div>`;
    };

    const renderEntries = (entries) => {
      if (!entries.length) {
        entriesEl.innerHTML = '<tr><td class="empty" colspan="4">No entries in the window yet.</td></tr>';
        return;
      }
      entriesEl.innerHTML = entries.map((entry) => `
        <tr>
          <td>${entry.date}</td>
          <td>${PEOPLE[entry.person] ?? entry.person}</td>
          <td>${entry.count}</td>
          <td class="actions">
            <button type="button" data-edit="${entry.id}">Edit</button>
            <button type="button" class="delete" data-delete="${entry.id}">Delete</button>
          </td>
        </tr>`).join('');
    };

    const renderChart = (daily) => {
      const rows = daily.slice().reverse();
      if (!rows.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">Nothing to chart yet</text>';
        return;
      }

      const width = 600;
      const height = 220;
      const padX = 36;
      const padY = 28;
      const max = Math.max(...rows.map((row) => Math.max(row.counts.sam ?? 0, row.counts.alex ?? 0)), 1);
      const slot = (width - padX * 2) / rows.length;
      const barWidth = Math.min(22, slot / 2 - 3);
      const scale = (height - padY * 2) / max;

      let svg = '';
      rows.forEach((row, index) => {
        const base = padX + index * slot + slot / 2;
        const samH = (row.counts.sam ?? 0) * scale;
        const alexH = (row.counts.alex ?? 0) * scale;
        svg += `<rect class="bar-sam" x="${base - barWidth - 2}" y="${height - padY - samH}" width="${barWidth}" height="${samH}" rx="3" />`;
        svg += `<rect class="bar-alex" x="${base + 2}" y="${height - padY - alexH}" width="${barWidth}" height="${alexH}" rx="3" />`;
        svg += `<text class="chart-label" x="${base}" y="${height - padY + 16}" text-anchor="middle">${row.date.slice(5)}</text>`;
      });
      svg += `<text class="chart-label" x="${padX - 6}" y="${padY}" text-anchor="end">${max}</text>`;
      chartEl.innerHTML = svg;
    };

    const applySnapshot = (snapshot) => {
      // the valid window moves forward at midnight
      dateEl.max = todayIso();
      editingId = snapshot.editing_id;
      submitBtn.textContent = editingId ? 'Save entry' : 'Add entry';
      cancelBtn.hidden = !editingId;
      if (editingId) {
        personEl.value = snapshot.draft.person;
        dateEl.value = snapshot.draft.date;
        countEl.value = snapshot.draft.count;
      }
      renderTotals(snapshot.totals);
      renderEntries(snapshot.entries);
      renderChart(snapshot.daily);
      setStatus(snapshot.error, snapshot.error ? 'error' : '');
    };

    const refresh = async () => {
      setStatus('Loading...', '');
      const snapshot = await api('/state');
      applySnapshot(snapshot);
      if (!snapshot.error) setStatus('', '');
    };

    const draftBody = (confirmed) => ({
      person: personEl.value,
      date: dateEl.value,
      count: countEl.value,
      confirmed
    });

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const count = Number(countEl.value);
      let confirmed = false;
      if (Number.isFinite(count) && count > HIGH_COUNT) {
        confirmed = window.confirm(`Really log ${count} reps in one entry?`);
        if (!confirmed) return;
      }
      try {
        const snapshot = await postJson(editingId ? '/save' : '/add', draftBody(confirmed));
        applySnapshot(snapshot);
        if (!snapshot.error) countEl.value = '';
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    cancelBtn.addEventListener('click', async () => {
      try {
        const snapshot = await postJson('/cancel', {});
        countEl.value = '';
        applySnapshot(snapshot);
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    entriesEl.addEventListener('click', async (event) => {
      const editId = event.target.dataset?.edit;
      const deleteId = event.target.dataset?.delete;
      try {
        if (editId) {
          applySnapshot(await postJson(`/edit/${editId}`, {}));
        } else if (deleteId) {
          const confirmed = window.confirm('Delete this entry?');
          if (!confirmed) return;
          applySnapshot(await postJson(`/delete/${deleteId}`, { confirmed }));
        }
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    clearBtn.addEventListener('click', async () => {
      const confirmed = window.confirm('Remove every entry for this exercise?');
      if (!confirmed) return;
      try {
        applySnapshot(await postJson('/clear', { confirmed }));
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    tabs.forEach((button) => {
      button.addEventListener('click', async () => {
        try {
          if (editingId) {
            // ends the edit session on the tab being left
            await postJson('/cancel', {});
            editingId = null;
          }
          exercise = button.dataset.exercise;
          tabs.forEach((tab) => tab.classList.toggle('active', tab === button));
          await refresh();
        } catch (err) {
          setStatus(err.message, 'error');
        }
      });
    });

    dateEl.value = todayIso();
    dateEl.max = todayIso();
    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
