//! Outgoing SMS bodies (Arabic)

use crate::domain::value_objects::dispatch::BookingConfirmation;

/// Verification code message
pub fn otp_body(brand: &str, code: &str, ttl_minutes: u32) -> String {
    format!(
        "كود التحقق من {brand}: {code}\nصالح لمدة {ttl_minutes} دقائق.\n⚠️ لا تشاركه مع أحد."
    )
}

/// Booking confirmation message
pub fn confirmation_body(brand: &str, booking: &BookingConfirmation) -> String {
    let customer = booking
        .customer_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("غير محدد");

    format!(
        "✅ تم تأكيد الحجز!\n\
         👤 الاسم: {customer}\n\
         ✂️ الحلاق: {barber}\n\
         🧾 الخدمة: {services}\n\
         📅 التاريخ: {date}\n\
         🕒 الساعة: {time}\n\
         📍 {brand} – شكرًا لحجزك!",
        barber = booking.barber_name,
        services = booking.services,
        date = booking.date,
        time = booking.time,
    )
}
