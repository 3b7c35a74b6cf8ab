use crate::charts::{
    MODE_FILE, MODE_TITLE, RATING_FILE, RATING_TITLE, WAREHOUSE_FILE, WAREHOUSE_TITLE,
    WEIGHT_FILE, WEIGHT_TITLE,
};

pub const PAGE_FILE: &str = "index.html";
pub const PAGE_TITLE: &str = "Shipping Dashboard";

/// Static dashboard page: two floated columns with two charts each.
/// Images are referenced by bare filename, so the page sits next to them.
pub fn render_dashboard_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{title}</title>
  </head>
  <body>
    <h1>{title}</h1>
    <div style="width:45%; float:left;">
      {warehouse}
      {mode}
    </div>
    <div style="width:45%; float:right;">
      {rating}
      {weight}
    </div>
  </body>
</html>
"#,
        title = PAGE_TITLE,
        warehouse = img_tag(WAREHOUSE_FILE, WAREHOUSE_TITLE, true),
        mode = img_tag(MODE_FILE, MODE_TITLE, false),
        rating = img_tag(RATING_FILE, RATING_TITLE, true),
        weight = img_tag(WEIGHT_FILE, WEIGHT_TITLE, false),
    )
}

fn img_tag(src: &str, alt: &str, spaced: bool) -> String {
    let margin = if spaced { " margin-bottom:10px;" } else { "" };
    format!(r#"<img src="{src}" alt="{alt}" style="width:100%;{margin}">"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_references_all_charts() {
        let html = render_dashboard_html();
        for file in [WAREHOUSE_FILE, MODE_FILE, RATING_FILE, WEIGHT_FILE] {
            assert!(html.contains(&format!("src=\"{file}\"")), "missing {file}");
        }
    }

    #[test]
    fn test_page_column_layout() {
        let html = render_dashboard_html();
        let left = html.find("float:left").unwrap();
        let right = html.find("float:right").unwrap();
        let pos = |f: &str| html.find(f).unwrap();

        assert!(left < pos(WAREHOUSE_FILE) && pos(WAREHOUSE_FILE) < pos(MODE_FILE));
        assert!(pos(MODE_FILE) < right);
        assert!(right < pos(RATING_FILE) && pos(RATING_FILE) < pos(WEIGHT_FILE));
    }

    #[test]
    fn test_page_title() {
        let html = render_dashboard_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Shipping Dashboard</title>"));
        assert!(html.contains("<h1>Shipping Dashboard</h1>"));
    }

    #[test]
    fn test_img_tag() {
        assert_eq!(
            img_tag("a.png", "A", false),
            r#"<img src="a.png" alt="A" style="width:100%;">"#
        );
        assert!(img_tag("a.png", "A", true).contains("margin-bottom:10px;"));
    }
}
