//! Fixed page served to the phone browser
//!
//! The page shows a tap target for "next" and arms a `devicemotion`
//! listener that requests `/next` whenever the x acceleration jumps by more
//! than the client-side threshold between two events.

/// Client-side x delta (m/s²) that triggers a `/next` fetch from the browser
pub const CLIENT_SHAKE_THRESHOLD: u32 = 15;

const PAGE_HEAD: &str = r#"<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Hand Control Remote</title>
</head>
<body style="background:#222;color:white;text-align:center;
font-family:sans-serif;display:flex;flex-direction:column;
justify-content:center;align-items:center;height:100vh;margin:0;">

<h1>SHAKE OR TAP</h1>
<a href="/next"
style="padding:40px 80px;background:#28a745;color:white;
font-size:30px;text-decoration:none;border-radius:15px;">
NEXT PAGE</a>

<script>
let lastX = 0;
"#;

const PAGE_TAIL: &str = r#"
window.addEventListener('devicemotion', (event) => {
    let x = event.accelerationIncludingGravity.x;
    if (Math.abs(x - lastX) > threshold) {
        fetch('/next');
    }
    lastX = x;
});
</script>

</body>
</html>
"#;

/// The HTML document, with the shake threshold filled in
pub fn remote_page() -> String {
    format!(
        "{}let threshold = {};\n{}",
        PAGE_HEAD, CLIENT_SHAKE_THRESHOLD, PAGE_TAIL
    )
}

/// Complete HTTP response carrying the remote page
pub fn http_response() -> String {
    let body = remote_page();
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_well_formed() {
        let response = http_response();
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        let (head, body) = response.split_once("\r\n\r\n").unwrap();
        assert!(head.contains(&format!("Content-Length: {}", body.len())));
        assert!(body.contains("fetch('/next')"));
        assert!(body.contains("let threshold = 15;"));
    }
}
