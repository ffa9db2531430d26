use duty_roster_lib::application::dto::YearView;

/// 年ビューの1か月分をカレンダーの形で出力する
pub fn show_month_debug_data(view: &YearView, month: u32) {
    let Some(month_view) = view.months.iter().find(|m| m.month == month) else {
        println!("(no month {month})");
        return;
    };

    println!("\n=======================================================");
    println!("[DEBUG] {}-{:02} ({} assigned days)", view.year, month, month_view.days.len());
    println!("=======================================================");
    println!("{}", ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(|l| format!("{l:<12}")).join(""));

    for week in &month_view.grid {
        let line: String = week
            .iter()
            .map(|&day| {
                if day == 0 {
                    return format!("{:<12}", "");
                }
                match month_view.days.get(&day) {
                    Some(cell) => format!("{:<12}", format!("{day:>2} {}", cell.name)),
                    None => format!("{:<12}", format!("{day:>2} -")),
                }
            })
            .collect();
        println!("{line}");
    }
    println!("=======================================================\n");
}
