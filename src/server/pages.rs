//! Pages module - generates the gallery and drawing HTML pages.

use crate::gallery::DoodleImage;

/// Placeholder shown when the folder holds no doodles.
pub const EMPTY_GALLERY_PLACEHOLDER: &str = "<p>No doodles yet!</p>";

/// Escape HTML special characters to prevent XSS attacks.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Render one gallery card.
fn render_card(doodle: &DoodleImage) -> String {
    let name = html_escape(&doodle.name);
    let link = html_escape(&doodle.view_link);
    let delete_url = format!("/delete/{}", urlencoding::encode(&doodle.name));

    format!(
        r#"
        <div class="card">
          <img src="{link}" alt="{name}">
          <br>
          <button data-name="{name}" data-url="{delete_url}" onclick="deleteImage(this)">🗑️ Delete</button>
        </div>"#
    )
}

/// Generate the gallery page for a sequence of doodles.
///
/// Each doodle becomes a card with its image and a delete button. An empty
/// sequence renders the "No doodles yet!" placeholder instead.
pub fn render_gallery<I>(doodles: I) -> String
where
    I: IntoIterator<Item = DoodleImage>,
{
    let cards: String = doodles.into_iter().map(|d| render_card(&d)).collect();
    let body = if cards.is_empty() {
        EMPTY_GALLERY_PLACEHOLDER.to_string()
    } else {
        cards
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>My Doodle Gallery</title>
    <style>
        body {{
            background-color: #feb1cb;
            font-family: sans-serif;
            text-align: center;
            padding: 2rem;
        }}
        h1 {{
            font-size: 2rem;
        }}
        .card {{
            margin: 20px;
            display: inline-block;
        }}
        .card img {{
            max-width: 300px;
            margin: 10px;
            border: 2px solid #ccc;
            border-radius: 8px;
        }}
        button {{
            background: #ff4b5c;
            color: white;
            border: none;
            padding: 0.5rem 1rem;
            border-radius: 5px;
            cursor: pointer;
        }}
        button:hover {{
            background: #e04353;
        }}
        nav a {{
            color: #333;
        }}
    </style>
</head>
<body>
    <h1>My Doodle Gallery</h1>
    <nav><a href="/draw">Draw a new doodle</a></nav>
    {body}
    <script>
        function deleteImage(button) {{
            const filename = button.dataset.name;
            if (confirm("Are you sure you want to delete " + filename + "?")) {{
                fetch(button.dataset.url, {{ method: 'DELETE' }})
                    .then(res => {{
                        if (res.ok) {{
                            alert("Deleted!");
                            location.reload();
                        }} else {{
                            alert("Failed to delete.");
                        }}
                    }});
            }}
        }}
    </script>
</body>
</html>
"##
    )
}

/// Generate the drawing page.
///
/// The page captures a drawing on a canvas and posts it to `/submit` as a
/// PNG data URI.
pub fn render_draw_page() -> String {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Draw a Doodle</title>
    <style>
        body {
            background-color: #feb1cb;
            font-family: sans-serif;
            text-align: center;
            padding: 2rem;
        }
        canvas {
            background: white;
            border: 2px solid #ccc;
            border-radius: 8px;
            touch-action: none;
        }
        .controls {
            margin-top: 1rem;
        }
        button {
            background: #ff4b5c;
            color: white;
            border: none;
            padding: 0.5rem 1rem;
            border-radius: 5px;
            cursor: pointer;
            margin: 0 0.25rem;
        }
        button:hover {
            background: #e04353;
        }
    </style>
</head>
<body>
    <h1>Draw a Doodle</h1>
    <canvas id="canvas" width="500" height="400"></canvas>
    <div class="controls">
        <input type="color" id="color" value="#000000">
        <input type="range" id="size" min="1" max="30" value="5">
        <button id="clear">Clear</button>
        <button id="submit">Submit</button>
    </div>
    <p><a href="/">Back to the gallery</a></p>
    <script>
        const canvas = document.getElementById('canvas');
        const ctx = canvas.getContext('2d');
        let drawing = false;

        function position(e) {
            const rect = canvas.getBoundingClientRect();
            return { x: e.clientX - rect.left, y: e.clientY - rect.top };
        }

        canvas.addEventListener('pointerdown', e => {
            drawing = true;
            const p = position(e);
            ctx.beginPath();
            ctx.moveTo(p.x, p.y);
        });
        canvas.addEventListener('pointermove', e => {
            if (!drawing) return;
            const p = position(e);
            ctx.lineWidth = document.getElementById('size').value;
            ctx.lineCap = 'round';
            ctx.strokeStyle = document.getElementById('color').value;
            ctx.lineTo(p.x, p.y);
            ctx.stroke();
        });
        ['pointerup', 'pointerleave'].forEach(evt =>
            canvas.addEventListener(evt, () => { drawing = false; }));

        document.getElementById('clear').addEventListener('click', () => {
            ctx.clearRect(0, 0, canvas.width, canvas.height);
        });

        document.getElementById('submit').addEventListener('click', () => {
            const imageData = canvas.toDataURL('image/png');
            fetch('/submit', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ imageData })
            })
                .then(res => res.ok ? res.json() : Promise.reject(res.status))
                .then(() => {
                    alert('Doodle submitted!');
                    ctx.clearRect(0, 0, canvas.width, canvas.height);
                })
                .catch(err => alert('Failed to submit doodle: ' + err));
        });
    </script>
</body>
</html>
"##
    .to_string()
}
