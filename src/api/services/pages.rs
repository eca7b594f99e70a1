//! 解析结果对应的极简 HTML 页面

use chrono::NaiveDate;

const STYLE: &str = "body{margin:0;padding:16px;min-height:100vh;display:flex;\
font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Roboto,sans-serif;\
background:#f7f7f7;box-sizing:border-box}\
.container{margin:auto;padding:24px 16px;max-width:320px;text-align:center;\
background:#fff;border-radius:12px}\
.qr-code{width:100%;max-width:240px;margin:20px 0}\
.info{font-size:14px;color:#999}";

/// 转义 HTML 文本与属性值
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n{}\n</div>\n</body>\n</html>",
        escape_html(title),
        STYLE,
        body
    )
}

/// 过期提示页
pub fn expired_page(name: Option<&str>, expiry: NaiveDate) -> String {
    let heading = match name {
        Some(n) if !n.is_empty() => format!("{} 已过期", escape_html(n)),
        _ => "链接已过期".to_string(),
    };
    let body = format!(
        "<h1 class=\"title\">{}</h1>\n<p class=\"info\">过期时间：{}</p>\n<p class=\"info\">如需访问，请联系管理员更新链接</p>",
        heading,
        expiry.format("%Y-%m-%d")
    );
    page("链接已过期", &body)
}

/// 微信活码页：展示存储的二维码图片
pub fn wechat_page(name: Option<&str>, qr_code_data: &str) -> String {
    let title = name.filter(|n| !n.is_empty()).unwrap_or("微信二维码");
    let body = format!(
        "<img class=\"wechat-icon\" src=\"wechat.svg\" alt=\"WeChat\" width=\"32\" height=\"32\">\n\
<h1 class=\"title\">{}</h1>\n<p class=\"notice\">请长按识别下方二维码</p>\n\
<img class=\"qr-code\" src=\"{}\" alt=\"微信群二维码\">\n<p class=\"info\">二维码失效请联系作者更新</p>",
        escape_html(title),
        escape_html(qr_code_data)
    );
    page(title, &body)
}
