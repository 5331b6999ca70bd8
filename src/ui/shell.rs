//! Document skeleton.

/// Wrap page content in the HTML document shell.
pub fn html_shell(title: &str, body_attrs: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Symptom checker chat">
    <title>{title}</title>

    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
    <link rel="stylesheet" href="/static/style.css">
    <script defer src="https://cdn.jsdelivr.net/npm/alpinejs@3.14.1/dist/cdn.min.js"></script>
</head>
<body {body_attrs}>
    <main class="chat-app-container">
        {content}
    </main>
</body>
</html>"#
    )
}
