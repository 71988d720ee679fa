use crate::models::{EntryView, JourneyResponse};
use crate::reminder::Permission;

pub fn render_index(view: &JourneyResponse) -> String {
    let stats = &view.stats;
    // Cards go in last so note text is never scanned for placeholders.
    INDEX_HTML
        .replace("{{COMPLETED}}", &stats.completed.to_string())
        .replace("{{REMAINING}}", &stats.remaining.to_string())
        .replace("{{PERCENT}}", &stats.percentage.to_string())
        .replace("{{PERCENT_LABEL}}", &stats.percentage_label())
        .replace("{{RANGE}}", &view.range)
        .replace(
            "{{REMINDER_HIDDEN}}",
            hidden_attr(view.permission != Permission::Unrequested),
        )
        .replace("{{COMPLETE_HIDDEN}}", hidden_attr(!view.complete))
        .replace("{{CARDS}}", &render_cards(&view.entries))
}

fn render_cards(entries: &[EntryView]) -> String {
    let mut html = String::new();
    for entry in entries {
        html.push_str(&format!(
            r#"      <form class="card" method="post" action="/days/{id}/toggle" data-id="{id}" data-checked="{checked}" data-today="{today}"{anchor}>
        <button class="card-main" type="submit" aria-pressed="{checked}">
          <span class="day">
            <span class="weekday">{weekday}</span>
            <span class="date">{date}</span>
          </span>
          <span class="marks"><span class="check" aria-hidden="true">&#10003;</span><span class="heart" aria-hidden="true">&#9829;</span></span>
        </button>
        <div class="journal"{journal_hidden}>
          <textarea rows="2" placeholder="Write a thought for today..." aria-label="Note for {label}">{note}</textarea>
        </div>
      </form>
"#,
            id = escape_html(&entry.id),
            checked = entry.checked,
            today = entry.is_today,
            anchor = if entry.is_today { r#" id="date-card-today""# } else { "" },
            weekday = escape_html(&entry.weekday),
            date = escape_html(&entry.display_text),
            journal_hidden = hidden_attr(!entry.checked),
            label = escape_html(&entry.label),
            note = escape_html(&entry.note),
        ));
    }
    html
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden { " hidden" } else { "" }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>UL</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Quicksand:wght@400;500;700&display=swap');

    :root {
      --rose-50: #fff1f2;
      --rose-100: #ffe4e6;
      --rose-200: #fecdd3;
      --rose-300: #fda4af;
      --rose-400: #fb7185;
      --rose-500: #f43f5e;
      --rose-600: #e11d48;
      --rose-700: #be123c;
      --rose-800: #9f1239;
      --rose-900: #881337;
      --pink-100: #fce7f3;
      --pink-400: #f472b6;
      --ink: #1f2937;
      --muted: #6b7280;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--rose-50), #fdf2f8 55%, #fff7ed 100%);
      color: var(--ink);
      font-family: "Quicksand", "Trebuchet MS", sans-serif;
      padding-bottom: 80px;
    }

    header {
      text-align: center;
      padding: 64px 16px 40px;
    }

    h1 {
      font-size: clamp(4rem, 12vw, 6rem);
      margin: 0 0 8px;
      color: var(--rose-900);
      letter-spacing: -0.02em;
    }

    .byline {
      display: flex;
      align-items: center;
      justify-content: center;
      gap: 8px;
      margin-bottom: 16px;
      font-size: 0.75rem;
      font-weight: 700;
      letter-spacing: 0.2em;
      text-transform: uppercase;
      color: var(--rose-700);
    }

    .byline::before,
    .byline::after {
      content: "";
      width: 32px;
      height: 1px;
      background: var(--rose-300);
    }

    .tagline {
      margin: 0;
      font-size: 1.15rem;
      font-style: italic;
      color: var(--rose-800);
      opacity: 0.8;
    }

    button {
      font-family: inherit;
      cursor: pointer;
    }

    .reminder {
      margin: 24px auto 0;
      display: inline-flex;
      align-items: center;
      gap: 8px;
      padding: 8px 16px;
      border: none;
      border-radius: 999px;
      background: rgba(255, 255, 255, 0.6);
      color: var(--rose-500);
      font-size: 0.75rem;
      font-weight: 700;
      letter-spacing: 0.1em;
      text-transform: uppercase;
      box-shadow: 0 1px 3px rgba(136, 19, 55, 0.12);
    }

    .progress {
      width: min(672px, 100%);
      margin: 0 auto 40px;
      padding: 0 16px;
    }

    .progress-counts {
      display: flex;
      justify-content: space-between;
      margin-bottom: 8px;
      font-weight: 500;
      color: rgba(136, 19, 55, 0.7);
    }

    .bar {
      height: 12px;
      border-radius: 999px;
      background: var(--rose-100);
      border: 1px solid rgba(254, 205, 211, 0.5);
      overflow: hidden;
    }

    .bar-fill {
      height: 100%;
      background: linear-gradient(90deg, var(--pink-400), var(--rose-500));
      transition: width 1s ease-out;
    }

    .percent {
      margin: 8px 0 0;
      text-align: center;
      font-size: 0.75rem;
      font-style: italic;
      font-family: Georgia, serif;
      color: var(--rose-400);
    }

    main {
      width: min(576px, 100%);
      margin: 0 auto;
      padding: 0 16px;
      display: grid;
      gap: 16px;
    }

    .card {
      margin: 0;
      border-radius: 16px;
      border: 1px solid rgba(255, 255, 255, 0.5);
      background: rgba(255, 255, 255, 0.4);
      transition: background 300ms ease, box-shadow 300ms ease;
      overflow: hidden;
    }

    .card:hover {
      background: rgba(255, 255, 255, 0.7);
    }

    .card[data-checked="true"] {
      background: linear-gradient(90deg, rgba(255, 228, 230, 0.8), rgba(252, 231, 243, 0.8));
      border-color: var(--rose-200);
    }

    .card[data-today="true"] {
      border-color: var(--rose-400);
      box-shadow: 0 10px 24px rgba(254, 205, 211, 0.9), 0 0 0 2px var(--rose-200);
    }

    .card-main {
      width: 100%;
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 16px;
      border: none;
      background: transparent;
      text-align: left;
      color: inherit;
    }

    .day {
      display: flex;
      flex-direction: column;
    }

    .weekday {
      font-size: 0.8rem;
      font-weight: 700;
      letter-spacing: 0.08em;
      text-transform: uppercase;
      color: var(--muted);
    }

    .date {
      margin-top: 4px;
      font-size: 1.5rem;
      font-weight: 700;
    }

    .card[data-checked="true"] .weekday {
      color: var(--rose-400);
      text-decoration: line-through;
    }

    .card[data-checked="true"] .date {
      color: var(--rose-800);
      opacity: 0.7;
      text-decoration: line-through;
    }

    .card[data-today="true"][data-checked="false"] .date {
      color: var(--rose-600);
    }

    .marks {
      display: flex;
      align-items: center;
      gap: 12px;
    }

    .check {
      width: 32px;
      height: 32px;
      display: grid;
      place-items: center;
      border-radius: 999px;
      border: 1px solid var(--rose-200);
      color: transparent;
      font-weight: 700;
    }

    .card[data-checked="true"] .check {
      background: var(--rose-500);
      border-color: var(--rose-500);
      color: white;
    }

    .heart {
      font-size: 1.4rem;
      color: var(--rose-200);
    }

    .card[data-checked="true"] .heart {
      color: var(--rose-500);
    }

    .journal {
      margin: 0 16px 16px;
      padding-top: 12px;
      border-top: 1px solid rgba(254, 205, 211, 0.5);
    }

    .journal textarea {
      width: 100%;
      resize: none;
      border: none;
      border-radius: 8px;
      padding: 12px;
      font: inherit;
      font-size: 0.9rem;
      color: #374151;
      background: rgba(255, 255, 255, 0.5);
    }

    .journal textarea:focus {
      outline: 1px solid var(--rose-300);
      background: white;
    }

    .completion {
      width: min(576px, 100%);
      margin: 48px auto 32px;
      padding: 0 16px;
    }

    #export-card {
      padding: 32px;
      border-radius: 24px;
      border: 1px solid var(--rose-200);
      background: linear-gradient(135deg, var(--rose-50), #fdf2f8);
      box-shadow: 0 20px 40px rgba(136, 19, 55, 0.12);
      text-align: center;
    }

    #export-card h2 {
      margin: 0 0 8px;
      font-size: 1.9rem;
      color: var(--rose-900);
    }

    #export-card .range {
      margin: 0 0 24px;
      color: var(--rose-700);
    }

    #export-card .divider {
      width: 64px;
      height: 4px;
      margin: 0 auto 24px;
      border-radius: 999px;
      background: var(--rose-300);
    }

    #export-card .quote {
      margin: 0 0 32px;
      font-style: italic;
      color: #374151;
    }

    #export-card .sign {
      font-size: 0.75rem;
      font-weight: 700;
      letter-spacing: 0.15em;
      text-transform: uppercase;
      color: var(--rose-400);
    }

    .export-actions {
      display: flex;
      flex-wrap: wrap;
      justify-content: center;
      gap: 16px;
      margin-top: 32px;
    }

    .export-actions button {
      padding: 12px 24px;
      border-radius: 999px;
      font-weight: 700;
      font-size: 1rem;
    }

    .export-actions button:disabled {
      opacity: 0.6;
      cursor: progress;
    }

    #export-pdf {
      border: none;
      background: var(--rose-600);
      color: white;
      box-shadow: 0 10px 24px rgba(254, 205, 211, 0.9);
    }

    #export-image {
      border: 2px solid var(--rose-200);
      background: white;
      color: var(--rose-600);
    }

    footer {
      margin-top: 80px;
      padding: 0 16px 40px;
      text-align: center;
    }

    footer .heart {
      color: var(--rose-400);
    }

    footer .quote {
      margin: 16px 0 0;
      font-weight: 700;
      font-size: 1.1rem;
      font-style: italic;
      color: var(--rose-800);
    }

    footer .range {
      margin: 8px 0 0;
      font-size: 0.75rem;
      font-weight: 600;
      color: var(--rose-300);
    }

    .to-top {
      position: fixed;
      right: 24px;
      bottom: 24px;
      width: 44px;
      height: 44px;
      border-radius: 999px;
      border: 1px solid var(--rose-100);
      background: rgba(255, 255, 255, 0.8);
      color: var(--rose-500);
      font-size: 1.1rem;
      box-shadow: 0 10px 24px rgba(136, 19, 55, 0.12);
    }

    [hidden] {
      display: none !important;
    }
  </style>
</head>
<body>
  <header>
    <h1>UL</h1>
    <div class="byline">Created By Uday</div>
    <p class="tagline">Counting the days until love returns.</p>
    <button class="reminder" id="reminder-btn" type="button"{{REMINDER_HIDDEN}}>&#128276; Enable 9PM Reminders</button>
  </header>

  <section class="progress">
    <div class="progress-counts">
      <span id="completed-count">{{COMPLETED}} Days Completed</span>
      <span id="remaining-count">{{REMAINING}} Days Remaining</span>
    </div>
    <div class="bar"><div class="bar-fill" id="bar-fill" style="width: {{PERCENT}}%"></div></div>
    <p class="percent" id="percent">{{PERCENT_LABEL}}% closer to forever</p>
  </section>

  <main>
{{CARDS}}  </main>

  <section class="completion" id="completion"{{COMPLETE_HIDDEN}}>
    <div id="export-card">
      <h2>Journey Completed</h2>
      <p class="range">{{RANGE}}</p>
      <div class="divider"></div>
      <p class="quote">"The wait is over. Love has returned."</p>
      <div class="sign">UL &bull; By Uday</div>
    </div>
    <div class="export-actions">
      <button id="export-pdf" type="button">Export Journal PDF</button>
      <button id="export-image" type="button">Share Image</button>
    </div>
  </section>

  <footer>
    <div class="heart">&#9829;</div>
    <p class="quote">&ldquo;Love is patient. I&rsquo;m waiting.&rdquo;</p>
    <p class="range">From {{RANGE}}</p>
  </footer>

  <button class="to-top" id="to-top" type="button" aria-label="Scroll to top">&uarr;</button>

  <script>
    const cards = Array.from(document.querySelectorAll('.card'));
    const reminderBtn = document.getElementById('reminder-btn');
    const completedEl = document.getElementById('completed-count');
    const remainingEl = document.getElementById('remaining-count');
    const barEl = document.getElementById('bar-fill');
    const percentEl = document.getElementById('percent');
    const completionEl = document.getElementById('completion');
    const pdfBtn = document.getElementById('export-pdf');
    const imageBtn = document.getElementById('export-image');

    const jsonHeaders = { 'content-type': 'application/json' };
    let exporting = false;
    let noteQueue = Promise.resolve();

    const applyStats = (stats) => {
      completedEl.textContent = `${stats.completed} Days Completed`;
      remainingEl.textContent = `${stats.remaining} Days Remaining`;
      barEl.style.width = `${stats.percentage}%`;
      percentEl.textContent = `${stats.percentage.toFixed(1)}% closer to forever`;
      completionEl.hidden = !(stats.total > 0 && stats.completed === stats.total);
    };

    const applyChecked = (ids) => {
      const checked = new Set(ids);
      cards.forEach((card) => {
        const isChecked = checked.has(card.dataset.id);
        card.dataset.checked = String(isChecked);
        card.querySelector('.card-main').setAttribute('aria-pressed', String(isChecked));
        card.querySelector('.journal').hidden = !isChecked;
      });
    };

    const applyJourney = (journey) => {
      const byId = new Map(journey.entries.map((entry) => [entry.id, entry]));
      cards.forEach((card) => {
        const entry = byId.get(card.dataset.id);
        const isToday = Boolean(entry && entry.is_today);
        card.dataset.today = String(isToday);
        if (isToday) {
          card.id = 'date-card-today';
        } else if (card.id === 'date-card-today') {
          card.removeAttribute('id');
        }
      });
      applyChecked(journey.entries.filter((entry) => entry.checked).map((entry) => entry.id));
      applyStats(journey.stats);
      reminderBtn.hidden = journey.permission !== 'unrequested';
    };

    const refreshJourney = async () => {
      const res = await fetch('/api/journey');
      if (!res.ok) {
        throw new Error('Unable to load journey');
      }
      applyJourney(await res.json());
    };

    const toggle = async (id) => {
      const res = await fetch('/api/toggle', {
        method: 'POST',
        headers: jsonHeaders,
        body: JSON.stringify({ id })
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      const data = await res.json();
      applyChecked(data.completed_ids);
      applyStats(data.stats);
    };

    const saveNote = async (id, text) => {
      const res = await fetch('/api/notes', {
        method: 'PUT',
        headers: jsonHeaders,
        body: JSON.stringify({ id, text })
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
    };

    const download = async (url, filename) => {
      const res = await fetch(url);
      if (res.status === 204) {
        return;
      }
      if (!res.ok) {
        throw new Error(await res.text());
      }
      const blob = await res.blob();
      const link = document.createElement('a');
      link.href = URL.createObjectURL(blob);
      link.download = filename;
      link.click();
      setTimeout(() => URL.revokeObjectURL(link.href), 1000);
    };

    const runExport = async (url, filename) => {
      if (exporting) {
        return;
      }
      exporting = true;
      pdfBtn.disabled = true;
      imageBtn.disabled = true;
      const pdfLabel = pdfBtn.textContent;
      pdfBtn.textContent = 'Generating...';
      try {
        await download(url, filename);
      } catch (err) {
        console.error('Export failed:', err);
      } finally {
        exporting = false;
        pdfBtn.disabled = false;
        imageBtn.disabled = false;
        pdfBtn.textContent = pdfLabel;
      }
    };

    const pollNotifications = async () => {
      if (!('Notification' in window) || Notification.permission !== 'granted') {
        return;
      }
      const res = await fetch('/api/notifications');
      if (!res.ok) {
        return;
      }
      const pending = await res.json();
      pending.forEach((item) => {
        new Notification(item.title, {
          body: item.body,
          icon: item.icon,
          tag: item.tag || undefined
        });
      });
    };

    const requestReminders = async () => {
      if (!('Notification' in window)) {
        alert('This browser does not support notifications.');
        return;
      }
      const result = await Notification.requestPermission();
      const res = await fetch('/api/notifications/permission', {
        method: 'POST',
        headers: jsonHeaders,
        body: JSON.stringify({ result })
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      const data = await res.json();
      reminderBtn.hidden = data.permission !== 'unrequested';
      await pollNotifications();
    };

    cards.forEach((card) => {
      card.addEventListener('submit', (event) => {
        event.preventDefault();
        toggle(card.dataset.id).catch((err) => console.error('Toggle failed:', err));
      });

      const textarea = card.querySelector('textarea');
      textarea.addEventListener('input', () => {
        const text = textarea.value;
        noteQueue = noteQueue
          .then(() => saveNote(card.dataset.id, text))
          .catch((err) => console.error('Failed to save note:', err));
      });
    });

    reminderBtn.addEventListener('click', () => {
      requestReminders().catch((err) => console.error('Reminder setup failed:', err));
    });

    pdfBtn.addEventListener('click', () => runExport('/export/journal.pdf', 'UL_Journey_Uday.pdf'));
    imageBtn.addEventListener('click', () => runExport('/export/image/export-card', 'UL_Journey_Completed.png'));

    document.getElementById('to-top').addEventListener('click', () => {
      window.scrollTo({ top: 0, behavior: 'smooth' });
    });

    setInterval(() => refreshJourney().catch((err) => console.error(err)), 60 * 60 * 1000);
    setInterval(() => pollNotifications().catch((err) => console.error(err)), 60 * 1000);
    pollNotifications().catch((err) => console.error(err));

    setTimeout(() => {
      const today = document.getElementById('date-card-today');
      if (today) {
        today.scrollIntoView({ behavior: 'smooth', block: 'center' });
      }
    }, 500);
  </script>
</body>
</html>
"#;
