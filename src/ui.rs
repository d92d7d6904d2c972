use crate::dates::{date_key, today};
use crate::tracker::Tracker;
use crate::units::{Unit, fixed1};

pub fn render_index(tracker: &Tracker) -> String {
    let unit = tracker.settings.unit;
    let current = tracker
        .summary()
        .map(|summary| format!("{} {unit}", fixed1(unit.from_kg(summary.current_kg))))
        .unwrap_or_else(|| "No entries yet".to_string());

    INDEX_HTML
        .replace("{{TODAY}}", &date_key(today()))
        .replace("{{UNIT}}", unit.as_str())
        .replace("{{CURRENT}}", &escape_html(&current))
        .replace("{{STREAK}}", &tracker.settings.streak.count.to_string())
        .replace("{{KG_ACTIVE}}", active(unit == Unit::Kg))
        .replace("{{LBS_ACTIVE}}", active(unit == Unit::Lbs))
}

fn active(on: bool) -> &'static str {
    if on { "active" } else { "" }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weight Tracker</title>
  <style>
    :root {
      --bg: #f1f5f9;
      --ink: #1e293b;
      --muted: #64748b;
      --accent: #7c3aed;
      --gain: #ef4444;
      --loss: #22c55e;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(30, 41, 59, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 16px 24px;
      background: var(--card);
      box-shadow: var(--shadow);
    }

    h1 { margin: 0; font-size: 1.3rem; }

    main {
      width: min(900px, 100%);
      margin: 0 auto;
      padding: 24px 16px 64px;
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .stat .label { color: var(--muted); font-size: 0.85rem; }
    .stat .value { font-size: 1.6rem; font-weight: 600; }
    .gain { color: var(--gain); }
    .loss { color: var(--loss); }

    form { display: grid; gap: 10px; }
    .row { display: flex; gap: 8px; flex-wrap: wrap; align-items: center; }
    input, textarea, select {
      font: inherit;
      padding: 8px 10px;
      border: 1px solid #cbd5e1;
      border-radius: 8px;
    }

    button {
      font: inherit;
      border: none;
      border-radius: 8px;
      padding: 8px 14px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    button.secondary { background: #e2e8f0; color: var(--ink); }
    .toggle button { background: #e2e8f0; color: var(--ink); }
    .toggle button.active { background: var(--accent); color: white; }

    ul.history { list-style: none; margin: 0; padding: 0; }
    ul.history li {
      display: flex;
      justify-content: space-between;
      gap: 12px;
      padding: 10px 0;
      border-bottom: 1px solid #e2e8f0;
    }
    .notes { color: var(--muted); font-size: 0.9rem; }

    .bars { display: flex; align-items: flex-end; gap: 8px; height: 160px; }
    .bar {
      flex: 1;
      background: var(--accent);
      border-radius: 6px 6px 0 0;
      position: relative;
      min-height: 4px;
    }
    .bar span {
      position: absolute;
      top: -20px;
      width: 100%;
      text-align: center;
      font-size: 0.75rem;
    }
    .bar-labels { display: flex; gap: 8px; font-size: 0.7rem; color: var(--muted); }
    .bar-labels span { flex: 1; text-align: center; }
    .trend { width: 100%; height: 180px; }
    .trend polyline { fill: none; stroke: var(--accent); stroke-width: 2; }
    .trend circle { fill: var(--accent); }
    .trend line.goal { stroke: var(--loss); stroke-dasharray: 4 4; }
    .trend text { fill: var(--muted); font-size: 10px; }

    .tip { font-style: italic; }
    .status { min-height: 1.2em; color: var(--muted); }
  </style>
</head>
<body>
  <header>
    <h1>Weight Tracker</h1>
    <div class="toggle" id="unit-toggle">
      <button data-unit="kg" class="{{KG_ACTIVE}}">kg</button>
      <button data-unit="lbs" class="{{LBS_ACTIVE}}">lbs</button>
    </div>
  </header>

  <main>
    <section class="card stats" id="stats">
      <div class="stat"><div class="label">Current</div><div class="value" id="stat-current">{{CURRENT}}</div></div>
      <div class="stat"><div class="label">Change</div><div class="value" id="stat-change">-</div><div class="label" id="stat-change-note"></div></div>
      <div class="stat"><div class="label" id="stat-goal-label">Goal</div><div class="value" id="stat-goal">N/A</div></div>
      <div class="stat"><div class="label">Day Streak</div><div class="value" id="stat-streak">{{STREAK}}</div></div>
      <div class="stat"><div class="label">BMI</div><div class="value" id="stat-bmi">-</div><div class="label" id="stat-bmi-category"></div></div>
    </section>

    <section class="card">
      <h2 id="form-title">Log New Weight</h2>
      <form id="entry-form">
        <input type="hidden" id="entry-id" />
        <div class="row">
          <input type="date" id="entry-date" value="{{TODAY}}" required />
          <input type="number" id="entry-weight" step="0.1" min="0" placeholder="Weight ({{UNIT}})" required />
        </div>
        <textarea id="entry-notes" rows="2" placeholder="How are you feeling today?"></textarea>
        <div class="row">
          <button type="submit" id="entry-submit">Add Entry</button>
          <button type="button" class="secondary" id="entry-cancel">Cancel</button>
        </div>
      </form>
      <p class="status" id="status"></p>
    </section>

    <section class="card">
      <h2>Goal &amp; Height</h2>
      <form id="goal-form" class="row">
        <input type="number" id="goal-input" step="0.1" min="0" placeholder="Goal ({{UNIT}})" />
        <button type="submit">Set Goal</button>
        <button type="button" class="secondary" id="goal-clear">Clear</button>
      </form>
      <form id="height-form" class="row">
        <select id="height-unit">
          <option value="cm">cm</option>
          <option value="ft">ft / in</option>
        </select>
        <input type="number" id="height-cm" min="0" placeholder="cm" />
        <input type="number" id="height-ft" min="0" placeholder="ft" hidden />
        <input type="number" id="height-in" min="0" placeholder="in" hidden />
        <button type="submit">Set Height</button>
      </form>
    </section>

    <section class="card">
      <h2>Progress</h2>
      <div id="progress"></div>
    </section>

    <section class="card">
      <h2>Weekly Comparison</h2>
      <div id="weekly"></div>
    </section>

    <section class="card">
      <div class="row" style="justify-content: space-between">
        <h2>History</h2>
        <a href="/api/export.csv"><button type="button">Export</button></a>
      </div>
      <ul class="history" id="history"></ul>
    </section>

    <section class="card">
      <div class="row" style="justify-content: space-between">
        <h2>Motivation</h2>
        <button type="button" class="secondary" id="tip-refresh">Refresh</button>
      </div>
      <p class="tip" id="tip">Loading...</p>
    </section>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    let unit = '{{UNIT}}';
    let latestTip = 0;

    const setStatus = (message) => { $('status').textContent = message; };

    const api = async (path, options = {}) => {
      const res = await fetch(path, {
        headers: { 'content-type': 'application/json' },
        ...options,
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const escapeHtml = (value) => value
      .replaceAll('&', '&amp;').replaceAll('<', '&lt;').replaceAll('>', '&gt;');

    const renderSummary = (summary) => {
      if (summary.status !== 'ok') {
        $('stat-current').textContent = 'No entries yet';
        $('stat-change').textContent = '-';
        $('stat-change-note').textContent = '';
        $('stat-bmi').textContent = '-';
        $('stat-bmi-category').textContent = '';
        return;
      }
      $('stat-current').textContent = `${summary.current} ${unit}`;
      $('stat-change').textContent = `${summary.change} ${unit}`;
      $('stat-change').className = `value ${summary.gained ? 'gain' : 'loss'}`;
      $('stat-change-note').textContent = `${summary.change_signed} since start`;
      $('stat-goal-label').textContent = summary.to_goal ? 'To Goal' : 'Goal';
      $('stat-goal').textContent = summary.to_goal ? `${summary.to_goal} ${unit}` : 'N/A';
      $('stat-streak').textContent = summary.streak;
      $('stat-bmi').textContent = summary.bmi ?? '-';
      $('stat-bmi-category').textContent = summary.bmi_category ?? 'Set your height';
    };

    const renderHistory = (entries) => {
      if (entries.length === 0) {
        $('history').innerHTML = '<li>No entries yet. Log your first weight above.</li>';
        return;
      }
      $('history').innerHTML = entries.map((entry) => `
        <li>
          <div>
            <strong>${entry.label}</strong> &middot; ${entry.weight.toFixed(1)} ${entry.unit}
            ${entry.notes ? `<div class="notes">${escapeHtml(entry.notes)}</div>` : ''}
          </div>
          <div class="row">
            <button class="secondary" data-edit="${entry.id}">Edit</button>
            <button class="secondary" data-delete="${entry.id}" data-label="${entry.label}">Delete</button>
          </div>
        </li>`).join('');
    };

    const renderWeekly = (weekly) => {
      if (weekly.status !== 'ok') {
        $('weekly').innerHTML = '<p class="status">Log weights across at least two weeks to compare.</p>';
        return;
      }
      const values = weekly.weeks.map((w) => w.average_weight);
      const min = Math.min(...values) - 2;
      const max = Math.max(...values) + 2;
      const bars = weekly.weeks.map((w) => {
        const height = ((w.average_weight - min) / (max - min)) * 100;
        return `<div class="bar" style="height:${height}%"><span>${w.average_weight.toFixed(1)}</span></div>`;
      }).join('');
      const labels = weekly.weeks.map((w) => `<span>${w.label}</span>`).join('');
      $('weekly').innerHTML = `<div class="bars">${bars}</div><div class="bar-labels">${labels}</div>`;
    };

    const renderProgress = (progress) => {
      if (progress.status !== 'ok') {
        $('progress').innerHTML = '<p class="status">Log at least two weights to see your trend.</p>';
        return;
      }
      const values = progress.points.map((p) => p.weight);
      if (progress.goal != null) values.push(progress.goal);
      const min = Math.min(...values) - 1;
      const max = Math.max(...values) + 1;
      const width = 600;
      const height = 180;
      const step = width / Math.max(progress.points.length - 1, 1);
      const y = (weight) => height - 20 - ((weight - min) / (max - min)) * (height - 40);
      const coords = progress.points.map((p, i) => [i * step, y(p.weight)]);
      const line = coords.map(([cx, cy]) => `${cx.toFixed(1)},${cy.toFixed(1)}`).join(' ');
      const dots = coords.map(([cx, cy], i) =>
        `<circle cx="${cx}" cy="${cy}" r="3"><title>${progress.points[i].label}: ${progress.points[i].weight.toFixed(1)} ${progress.unit}</title></circle>`).join('');
      const goal = progress.goal != null
        ? `<line class="goal" x1="0" x2="${width}" y1="${y(progress.goal)}" y2="${y(progress.goal)}" />`
        : '';
      const first = progress.points[0];
      const last = progress.points[progress.points.length - 1];
      $('progress').innerHTML = `
        <svg class="trend" viewBox="-6 0 ${width + 12} ${height}" preserveAspectRatio="none">
          ${goal}<polyline points="${line}" />${dots}
          <text x="0" y="${height - 4}">${first.label}</text>
          <text x="${width}" y="${height - 4}" text-anchor="end">${last.label}</text>
        </svg>`;
    };

    const refresh = async () => {
      const [summary, entries, progress, weekly] = await Promise.all([
        api('/api/summary'),
        api('/api/entries'),
        api('/api/progress'),
        api('/api/weekly'),
      ]);
      renderSummary(summary);
      renderHistory(entries);
      renderProgress(progress);
      renderWeekly(weekly);
    };

    const resetForm = () => {
      $('entry-id').value = '';
      $('entry-date').value = '{{TODAY}}';
      $('entry-weight').value = '';
      $('entry-notes').value = '';
      $('form-title').textContent = 'Log New Weight';
      $('entry-submit').textContent = 'Add Entry';
    };

    $('entry-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const weight = parseFloat($('entry-weight').value);
      if (!weight || weight <= 0) {
        setStatus('Please enter a valid weight.');
        return;
      }
      const id = $('entry-id').value;
      const body = JSON.stringify({
        date: $('entry-date').value,
        weight,
        notes: $('entry-notes').value,
      });
      try {
        await api(id ? `/api/entries/${id}` : '/api/entries', { method: id ? 'PUT' : 'POST', body });
        resetForm();
        setStatus('Saved');
        await refresh();
      } catch (err) {
        setStatus(err.message);
      }
    });

    $('entry-cancel').addEventListener('click', resetForm);

    $('history').addEventListener('click', async (event) => {
      const editId = event.target.dataset.edit;
      const deleteId = event.target.dataset.delete;
      try {
        if (editId) {
          const entry = await api(`/api/entries/${editId}`);
          $('entry-id').value = entry.id;
          $('entry-date').value = entry.date;
          $('entry-weight').value = entry.weight.toFixed(1);
          $('entry-notes').value = entry.notes ?? '';
          $('form-title').textContent = 'Edit Entry';
          $('entry-submit').textContent = 'Save Changes';
        } else if (deleteId) {
          if (!window.confirm(`Are you sure you want to delete the entry for ${event.target.dataset.label}?`)) {
            return;
          }
          await api(`/api/entries/${deleteId}`, { method: 'DELETE' });
          await refresh();
        }
      } catch (err) {
        setStatus(err.message);
      }
    });

    $('unit-toggle').addEventListener('click', async (event) => {
      const next = event.target.dataset.unit;
      if (!next || next === unit) return;
      await api('/api/settings/unit', { method: 'PUT', body: JSON.stringify({ unit: next }) });
      window.location.reload();
    });

    $('goal-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const goal = parseFloat($('goal-input').value);
      try {
        await api('/api/settings/goal', { method: 'PUT', body: JSON.stringify({ goal: goal > 0 ? goal : null }) });
        await refresh();
      } catch (err) {
        setStatus(err.message);
      }
    });

    $('goal-clear').addEventListener('click', async () => {
      await api('/api/settings/goal', { method: 'PUT', body: JSON.stringify({ goal: null }) });
      $('goal-input').value = '';
      await refresh();
    });

    $('height-unit').addEventListener('change', () => {
      const metric = $('height-unit').value === 'cm';
      $('height-cm').hidden = !metric;
      $('height-ft').hidden = metric;
      $('height-in').hidden = metric;
    });

    $('height-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const height = $('height-unit').value === 'cm'
        ? { unit: 'cm', value: parseFloat($('height-cm').value) || 0 }
        : { unit: 'ft', feet: parseInt($('height-ft').value, 10) || 0, inches: parseInt($('height-in').value, 10) || 0 };
      try {
        await api('/api/settings/height', { method: 'PUT', body: JSON.stringify({ height }) });
        await refresh();
      } catch (err) {
        setStatus(err.message);
      }
    });

    const loadTip = async () => {
      $('tip').textContent = 'Loading...';
      const result = await api('/api/tip');
      if (result.stale || result.sequence < latestTip) return;
      latestTip = result.sequence;
      $('tip').textContent = `"${result.tip}"`;
    };

    $('tip-refresh').addEventListener('click', () => loadTip().catch((err) => setStatus(err.message)));

    refresh().catch((err) => setStatus(err.message));
    loadTip().catch((err) => setStatus(err.message));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::Streak;

    #[test]
    fn page_reflects_unit_and_streak() {
        let mut tracker = Tracker::default();
        tracker.set_unit(Unit::Lbs);
        tracker.settings.streak = Streak::new(4, None);

        let html = render_index(&tracker);

        assert!(html.contains("let unit = 'lbs';"));
        assert!(html.contains(r#"id="stat-streak">4<"#));
        assert!(html.contains("No entries yet"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn page_loads_every_chart_series() {
        let html = render_index(&Tracker::default());

        for path in ["/api/summary", "/api/entries", "/api/progress", "/api/weekly"] {
            assert!(html.contains(&format!("api('{path}')")), "missing {path}");
        }
        assert!(html.contains(r#"id="progress""#));
        assert!(html.contains("renderProgress(progress);"));
    }
}
